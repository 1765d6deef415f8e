//! Downloads and extracts catalogue archives.

use std::{fs::File, io::Write, path::Path};

use flate2::read::GzDecoder;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tar::Archive;

use crate::errors::{Error, Result};

/// Downloads an archive from the specified URL and saves it to the specified
/// file path, streaming chunks so large grids never sit in memory. The
/// caller's spinner is converted to a byte progress bar when the server
/// announces a content length.
pub async fn download_archive(
    url: &str,
    file_path: &Path,
    progress_bar: &ProgressBar,
) -> Result<()> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::TransientNetwork(format!("failed to reach `{}`: {}", url, e)))?;

    let status = response.status();
    if status.is_client_error() {
        return Err(Error::InvalidRequest(format!(
            "archive `{}` is not available: {}",
            url, status
        )));
    }
    if !status.is_success() {
        return Err(Error::TransientNetwork(format!(
            "archive fetch failed with {}",
            status
        )));
    }

    if let Some(total_size) = response.content_length() {
        progress_bar.set_length(total_size);
        progress_bar.set_style(
            ProgressStyle::with_template(
                "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {eta}",
            )
            .unwrap()
            .progress_chars("=> "),
        );
    }

    let mut file = File::create(file_path)?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| Error::TransientNetwork(format!("error reading chunk: {}", e)))?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        progress_bar.set_position(downloaded);
    }

    Ok(())
}

/// Extracts the tarball at the specified path into the working directory.
pub fn extract_tar(tar_gz_path: &Path, working_dir: &Path) -> Result<()> {
    let tar_gz = File::open(tar_gz_path)?;
    let tar = GzDecoder::new(tar_gz);
    let mut archive = Archive::new(tar);

    archive
        .unpack(working_dir)
        .map_err(|e| Error::Archive(format!("failed to unpack archive: {}", e)))?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use std::io::Read;
    use std::path::PathBuf;

    use flate2::{write::GzEncoder, Compression};
    use tempfile::TempDir;

    use super::*;

    fn write_archive(dir: &Path, member_name: &str, content: &str) -> PathBuf {
        let archive_path = dir.join("payload.tar.gz");
        let file = File::create(&archive_path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);

        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, member_name, content.as_bytes())
            .unwrap();
        builder.into_inner().unwrap().finish().unwrap();

        archive_path
    }

    #[test]
    fn should_extract_archive_members() {
        let temp_dir = TempDir::new().unwrap();
        let archive_path = write_archive(temp_dir.path(), "tg_full.dat", "1950-01-01 45.0 7.0 1.5");

        let out_dir = temp_dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();
        extract_tar(&archive_path, &out_dir).unwrap();

        let mut content = String::new();
        File::open(out_dir.join("tg_full.dat"))
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();

        assert_eq!(content, "1950-01-01 45.0 7.0 1.5");
    }

    #[test]
    fn should_reject_corrupt_archive() {
        let temp_dir = TempDir::new().unwrap();
        let bogus = temp_dir.path().join("bogus.tar.gz");
        std::fs::write(&bogus, "not a tarball").unwrap();

        let result = extract_tar(&bogus, temp_dir.path());
        assert!(matches!(result, Err(Error::Archive(_))));
    }

    #[test]
    fn should_convert_spinner_to_byte_progress_bar() {
        let pb = ProgressBar::new_spinner().with_message("Downloading...");

        pb.set_length(1000);
        pb.set_style(
            ProgressStyle::with_template(
                "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {eta}",
            )
            .unwrap()
            .progress_chars("=> "),
        );
        pb.set_position(500);

        assert_eq!(pb.length().unwrap(), 1000);
        assert_eq!(pb.position(), 500);
    }
}
