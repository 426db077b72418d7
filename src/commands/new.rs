//! Create a new post or page

use anyhow::Result;
use std::fs;

use crate::Mica;

/// Create a new post (default) or standalone page skeleton
pub fn run(mica: &Mica, title: &str, page: bool) -> Result<()> {
    let now = chrono::Local::now();
    let slug = slug::slugify(title);

    let (dir, content) = if page {
        (
            mica.content_dir.clone(),
            format!("+++\ntitle = \"{}\"\n+++\n", title),
        )
    } else {
        (
            mica.content_dir.join(&mica.config.blog_dir),
            format!(
                "+++\ntitle = \"{}\"\ndate = {}\n+++\n",
                title,
                now.format("%Y-%m-%d")
            ),
        )
    };

    fs::create_dir_all(&dir)?;
    let file_path = dir.join(format!("{}.md", slug));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_has_parseable_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        let mica = Mica::new(dir.path()).unwrap();

        run(&mica, "Bitfields, revisited", false).unwrap();

        let path = dir.path().join("content/blog/bitfields-revisited.md");
        let raw = fs::read_to_string(&path).unwrap();
        let (fm, _) = crate::content::FrontMatter::parse(&raw).unwrap();
        assert_eq!(fm.title, Some("Bitfields, revisited".to_string()));
        assert!(fm.parse_date().is_some());
    }

    #[test]
    fn test_new_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let mica = Mica::new(dir.path()).unwrap();

        run(&mica, "once", true).unwrap();
        assert!(run(&mica, "once", true).is_err());
    }
}
