//! Name generation for the `backup` and `rename` collision policies.

use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_SUFFIX: &str = "~";

/// Where to move an existing file before it is replaced.
///
/// Uses `name~` for the first backup and `name.~N~` once that is taken.
pub async fn generate_backup_path(destination: &Path) -> io::Result<PathBuf> {
    let max_number = find_max_backup_number(destination).await?;
    let simple = add_suffix(destination);
    if max_number == 0 && !tokio::fs::try_exists(&simple).await? {
        Ok(simple)
    } else {
        Ok(format_numbered_backup(destination, max_number + 1))
    }
}

/// First free `stem~N.ext` next to `destination`, starting at 1.
pub async fn generate_numbered_name(destination: &Path) -> io::Result<PathBuf> {
    let file_name = destination
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid file name"))?
        .to_string_lossy()
        .into_owned();
    let (stem, ext) = split_extension(&file_name);

    let mut number = 1u32;
    loop {
        let candidate = match ext {
            Some(ext) => destination.with_file_name(format!("{}~{}.{}", stem, number, ext)),
            None => destination.with_file_name(format!("{}~{}", stem, number)),
        };
        if !tokio::fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
        number = number.checked_add(1).ok_or_else(|| {
            io::Error::other(format!(
                "no free numbered name for '{}'",
                destination.display()
            ))
        })?;
    }
}

// A leading dot belongs to the stem: ".bashrc" has no extension.
fn split_extension(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rfind('.') {
        Some(0) | None => (file_name, None),
        Some(idx) => (&file_name[..idx], Some(&file_name[idx + 1..])),
    }
}

async fn find_max_backup_number(path: &Path) -> io::Result<u32> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid file name"))?
        .to_string_lossy();
    let pattern_prefix = format!("{}.~", file_name);

    let mut max_number = 0u32;

    let mut entries = tokio::fs::read_dir(parent).await?;
    while let Some(entry) = entries.next_entry().await? {
        let entry_name = entry.file_name();
        let entry_name_str = entry_name.to_string_lossy();

        if entry_name_str.starts_with(&pattern_prefix) && entry_name_str.ends_with('~') {
            let num_part = &entry_name_str[pattern_prefix.len()..entry_name_str.len() - 1];
            if let Ok(num) = num_part.parse::<u32>() {
                max_number = max_number.max(num);
            }
        }
    }

    Ok(max_number)
}

fn add_suffix(path: &Path) -> PathBuf {
    let mut path_str = path.as_os_str().to_os_string();
    path_str.push(DEFAULT_SUFFIX);
    PathBuf::from(path_str)
}

fn format_numbered_backup(path: &Path, number: u32) -> PathBuf {
    let mut path_str = path.as_os_str().to_os_string();
    path_str.push(format!(".~{}~", number));
    PathBuf::from(path_str)
}

pub async fn create_backup(destination: &Path, backup_path: &Path) -> io::Result<()> {
    tokio::fs::rename(destination, backup_path).await
}
