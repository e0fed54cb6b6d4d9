use crate::config::Config;
use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::path::expand_tilde;
use rusqlite::Connection;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the workbook file to `dest_file`, optionally zipping it.
    /// Returns the path that was finally written, or `None` when the user
    /// declined to overwrite an existing file.
    pub fn backup(cfg: &Config, dest_file: &str, compress: bool) -> AppResult<Option<PathBuf>> {
        let src = Path::new(&cfg.database);
        let dest_buf = expand_tilde(dest_file);
        let dest = dest_buf.as_path();

        if !src.exists() {
            return Err(AppError::from(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Workbook not found: {}", src.display()),
            )));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        if dest.exists() && !confirm_overwrite(dest)? {
            warning("Backup cancelled by user.");
            return Ok(None);
        }

        fs::copy(src, dest)?;
        success(format!("Backup created: {}", dest.display()));

        let final_path = if compress {
            let compressed = compress_backup(dest)?;
            if compressed != dest {
                match fs::remove_file(dest) {
                    Ok(()) => info(format!("Removed uncompressed backup: {}", dest.display())),
                    Err(e) => warning(format!("Failed to remove uncompressed backup: {e}")),
                }
            }
            compressed
        } else {
            dest.to_path_buf()
        };

        if let Ok(conn) = Connection::open(src)
            && let Err(e) = ttlog(
                &conn,
                "backup",
                &final_path.to_string_lossy(),
                if compress {
                    "Backup created and compressed"
                } else {
                    "Backup created"
                },
            )
        {
            warning(format!("Failed to write internal log: {e}"));
        }

        Ok(Some(final_path))
    }
}

fn confirm_overwrite(dest: &Path) -> AppResult<bool> {
    println!(
        "⚠️  The file '{}' already exists.\nDo you want to overwrite it? [y/N]: ",
        dest.display()
    );
    print!("> ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Compress a backup into a sibling `.zip` file.
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "squadlog.sqlite".to_string());

    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut f = fs::File::open(path)?;
    zip.start_file(entry_name, options)
        .map_err(io::Error::other)?;
    io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(io::Error::other)?;

    info(format!("Compressed: {}", zip_path.display()));
    Ok(zip_path)
}
