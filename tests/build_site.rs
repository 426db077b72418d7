//! End-to-end build tests over a scratch site directory

use std::fs;
use std::path::Path;

use mica::{BuildError, Mica};

fn write(base: &Path, rel: &str, content: &str) {
    let path = base.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn site_with_config(config: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "config.toml", config);
    dir
}

fn default_site() -> tempfile::TempDir {
    site_with_config("title = \"field notes\"\nurl = \"https://example.net\"\n")
}

#[test]
fn builds_pages_posts_and_index() {
    let dir = default_site();
    write(
        dir.path(),
        "content/about.md",
        "+++\ntitle = \"about me\"\n\n[extra]\nin_header = true\n+++\n\nHello.\n",
    );
    write(
        dir.path(),
        "content/blog/first.md",
        "+++\ntitle = \"first\"\ndate = 2022-01-10\n+++\n\nOld news.\n",
    );
    write(
        dir.path(),
        "content/blog/second.md",
        "+++\ntitle = \"second\"\ndate = 2023-05-14\nupdated = 2023-05-16\n+++\n\nNewer.\n",
    );

    let mica = Mica::new(dir.path()).unwrap();
    mica.build().unwrap();

    assert!(dir.path().join("public/about/index.html").exists());
    assert!(dir.path().join("public/blog/first/index.html").exists());
    assert!(dir.path().join("public/blog/second/index.html").exists());

    // Index lists posts newest first and carries the header nav
    let index = fs::read_to_string(dir.path().join("public/index.html")).unwrap();
    let second_pos = index.find("/blog/second/").unwrap();
    let first_pos = index.find("/blog/first/").unwrap();
    assert!(second_pos < first_pos);
    assert!(index.contains("href=\"/about/\""));
    assert!(index.contains("about me"));

    // Adjacent posts link to each other
    let newest = fs::read_to_string(dir.path().join("public/blog/second/index.html")).unwrap();
    assert!(newest.contains("href=\"/blog/first/\""));
}

#[test]
fn unresolved_footnote_fails_naming_the_page() {
    let dir = default_site();
    write(
        dir.path(),
        "content/blog/broken.md",
        "+++\ntitle = \"broken\"\ndate = 2023-01-01\n+++\n\nA claim.[^1]\n",
    );

    let mica = Mica::new(dir.path()).unwrap();
    let err = mica.build().unwrap_err();

    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::UnresolvedFootnote { id }) if id == "1"
    ));
    assert!(format!("{:#}", err).contains("broken.md"));

    // Fail-fast: nothing was published
    assert!(!dir.path().join("public/blog/broken/index.html").exists());
}

#[test]
fn duplicate_slug_fails_the_whole_build() {
    let dir = default_site();
    write(dir.path(), "content/about.md", "+++\ntitle = \"a\"\n+++\n\nOne.\n");
    write(
        dir.path(),
        "content/about/index.md",
        "+++\ntitle = \"b\"\n+++\n\nTwo.\n",
    );

    let mica = Mica::new(dir.path()).unwrap();
    let err = mica.build().unwrap_err();

    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::DuplicateSlug { slug, .. }) if slug == "about"
    ));
    assert!(!dir.path().join("public/index.html").exists());
}

#[test]
fn malformed_front_matter_aborts() {
    let dir = default_site();
    write(
        dir.path(),
        "content/bad.md",
        "+++\ntitle = \"never closed\"\n\nBody text.\n",
    );

    let mica = Mica::new(dir.path()).unwrap();
    let err = mica.build().unwrap_err();

    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::MalformedFrontMatter { .. })
    ));
    assert!(format!("{:#}", err).contains("bad.md"));
}

#[test]
fn post_without_date_aborts() {
    let dir = default_site();
    write(
        dir.path(),
        "content/blog/undated.md",
        "+++\ntitle = \"undated\"\n+++\n\nBody.\n",
    );

    let mica = Mica::new(dir.path()).unwrap();
    assert!(mica.build().is_err());
}

#[test]
fn drafts_are_skipped_unless_enabled() {
    let dir = default_site();
    write(
        dir.path(),
        "content/blog/wip.md",
        "+++\ntitle = \"wip\"\ndate = 2023-01-01\ndraft = true\n+++\n\nNot yet.\n",
    );

    let mica = Mica::new(dir.path()).unwrap();
    mica.build().unwrap();
    assert!(!dir.path().join("public/blog/wip/index.html").exists());

    let mut mica = Mica::new(dir.path()).unwrap();
    mica.config.render_drafts = true;
    mica.build().unwrap();
    assert!(dir.path().join("public/blog/wip/index.html").exists());
}

#[test]
fn long_form_post_renders_all_block_kinds() {
    let dir = default_site();
    write(
        dir.path(),
        "content/blog/bitfields.md",
        r#"+++
title = "a bitfield macro, three years later"
date = 2023-05-14
updated = 2023-05-16
+++

The library generates accessors from a width table.[^1]

| field | width |
|-------|-------|
| flags | 3     |
| index | 13    |

```rust
bitfield! {
    struct Header(u16);
    flags: 3;
    index: 13;
}
```

:::aside
The width column is the whole interface.
:::

See [the announcement](https://example.net/announcement) for history.

[^1]: Widths are validated at expansion time.
"#,
    );

    let mica = Mica::new(dir.path()).unwrap();
    mica.build().unwrap();

    let html = fs::read_to_string(dir.path().join("public/blog/bitfields/index.html")).unwrap();
    assert!(html.contains("<table>"));
    assert!(html.contains("language-rust"));
    // Snippet survives verbatim (escaped but not reformatted)
    assert!(html.contains("index: 13;"));
    assert!(html.contains("<aside>"));
    assert!(html.contains("href=\"https://example.net/announcement\""));
    assert!(html.contains("Widths are validated"));
    assert!(html.contains("updated May 16, 2023"));
}

#[cfg(unix)]
#[test]
fn unreadable_content_entry_aborts() {
    let dir = default_site();
    write(
        dir.path(),
        "content/blog/fine.md",
        "+++\ntitle = \"fine\"\ndate = 2023-01-01\n+++\n\nOk.\n",
    );
    // A dangling symlink makes the walk fail partway through
    std::os::unix::fs::symlink(
        dir.path().join("content/nowhere.md"),
        dir.path().join("content/ghost.md"),
    )
    .unwrap();

    let mica = Mica::new(dir.path()).unwrap();
    let err = mica.build().unwrap_err();

    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::Io { .. })
    ));
    assert!(!dir.path().join("public/blog/fine/index.html").exists());
}

#[test]
fn rebuild_is_deterministic() {
    let dir = default_site();
    write(
        dir.path(),
        "content/blog/a.md",
        "+++\ntitle = \"a\"\ndate = 2023-02-01\n+++\n\nAlpha.\n",
    );
    write(
        dir.path(),
        "content/blog/b.md",
        "+++\ntitle = \"b\"\ndate = 2023-02-01\n+++\n\nBeta.\n",
    );

    let mica = Mica::new(dir.path()).unwrap();
    mica.build().unwrap();
    let first = fs::read_to_string(dir.path().join("public/index.html")).unwrap();

    mica.build().unwrap();
    let second = fs::read_to_string(dir.path().join("public/index.html")).unwrap();
    assert_eq!(first, second);

    // Same-date posts tie-break by slug
    let a_pos = first.find("/blog/a/").unwrap();
    let b_pos = first.find("/blog/b/").unwrap();
    assert!(a_pos < b_pos);
}
