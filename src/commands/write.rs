//! Write command implementation

use envwp_probe::{probe_with, ProbeConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Chunk size for writing
const WRITE_CHUNK_SIZE: usize = 4096;
/// Chunk size for verification
const VERIFY_CHUNK_SIZE: usize = 4096;

/// Run the write command
///
/// Write protection is lifted only around the write itself; verification
/// reads happen after the previous state has been restored.
pub fn run_write(
    config: &ProbeConfig,
    device: &str,
    input: &Path,
    offset: u64,
    do_verify: bool,
) -> Result<(), Box<dyn Error>> {
    let data = fs::read(input).map_err(|e| format!("Failed to read {:?}: {}", input, e))?;
    println!("Read {} bytes from {:?}", data.len(), input);

    match probe_with(config, device)? {
        Some(mut handle) => {
            println!(
                "Using {} write protection control ({})",
                handle.strategy(),
                handle.control_path().display()
            );
            let guard = handle.unprotected();
            log::info!("Protection before write: {}", guard.archived());
            write_device_with_progress(device, offset, &data)?;
        }
        None => {
            log::info!("No write protection control for {}, writing directly", device);
            write_device_with_progress(device, offset, &data)?;
        }
    }

    if do_verify {
        verify_device_with_progress(device, offset, &data)?;
    }

    println!("Write complete!");
    Ok(())
}

fn progress_bar(total: u64, phase: &str) -> Result<ProgressBar, Box<dyn Error>> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {}",
                phase
            ))?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Write data to the device at `offset` and flush it to the hardware
pub fn write_device_with_progress(
    device: &str,
    offset: u64,
    data: &[u8],
) -> Result<(), Box<dyn Error>> {
    let mut file = OpenOptions::new()
        .write(true)
        .open(device)
        .map_err(|e| format!("Failed to open {} for writing: {}", device, e))?;
    file.seek(SeekFrom::Start(offset))?;

    let pb = progress_bar(data.len() as u64, "Writing")?;
    let mut written = 0usize;
    for chunk in data.chunks(WRITE_CHUNK_SIZE) {
        file.write_all(chunk).map_err(|e| {
            pb.abandon_with_message("Write failed!");
            format!(
                "Write failed at offset 0x{:08X}: {}",
                offset + written as u64,
                e
            )
        })?;
        written += chunk.len();
        pb.set_position(written as u64);
    }

    file.sync_all()
        .map_err(|e| format!("Failed to sync {}: {}", device, e))?;
    pb.finish_with_message("Write complete");
    Ok(())
}

/// Read the device back and compare against the expected data
pub fn verify_device_with_progress(
    device: &str,
    offset: u64,
    expected: &[u8],
) -> Result<(), Box<dyn Error>> {
    let mut file =
        File::open(device).map_err(|e| format!("Failed to open {} for reading: {}", device, e))?;
    file.seek(SeekFrom::Start(offset))?;

    let pb = progress_bar(expected.len() as u64, "Verifying")?;
    let mut buf = vec![0u8; VERIFY_CHUNK_SIZE];
    let mut pos = 0usize;
    for expected_chunk in expected.chunks(VERIFY_CHUNK_SIZE) {
        let chunk = &mut buf[..expected_chunk.len()];
        file.read_exact(chunk)?;

        if chunk != expected_chunk {
            pb.abandon_with_message("Verification failed!");
            // Find first difference
            for (i, (a, b)) in chunk.iter().zip(expected_chunk.iter()).enumerate() {
                if a != b {
                    return Err(format!(
                        "Verification failed at offset 0x{:08X}: expected 0x{:02X}, got 0x{:02X}",
                        offset + (pos + i) as u64,
                        b,
                        a
                    )
                    .into());
                }
            }
        }

        pos += expected_chunk.len();
        pb.set_position(pos as u64);
    }

    pb.finish_with_message("Verification passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        config: ProbeConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let config = ProbeConfig::new()
                .with_dev_root(dir.path().join("dev"))
                .with_sysfs_block_root(dir.path().join("sys/class/block"));
            fs::create_dir_all(config.dev_root()).unwrap();
            Self { dir, config }
        }

        fn device(&self, name: &str, size: usize) -> String {
            let path = self.config.dev_root().join(name);
            fs::write(&path, vec![0xFFu8; size]).unwrap();
            path.to_str().unwrap().to_string()
        }

        fn force_ro(&self, name: &str, contents: &[u8]) -> std::path::PathBuf {
            let dir = self.config.sysfs_block_root().join(name);
            fs::create_dir_all(&dir).unwrap();
            let path = dir.join("force_ro");
            fs::write(&path, contents).unwrap();
            path
        }

        fn input(&self, data: &[u8]) -> std::path::PathBuf {
            let path = self.dir.path().join("env.bin");
            fs::write(&path, data).unwrap();
            path
        }
    }

    #[cfg(feature = "mmcblk")]
    #[test]
    fn test_write_restores_protection() {
        let fx = Fixture::new();
        let device = fx.device("mmcblk0boot1", 0x4000);
        let force_ro = fx.force_ro("mmcblk0boot1", b"1");
        let data: Vec<u8> = (0..5000u32).map(|i| i as u8).collect();
        let input = fx.input(&data);

        run_write(&fx.config, &device, &input, 0x2000, true).unwrap();

        let contents = fs::read(&device).unwrap();
        assert_eq!(&contents[0x2000..0x2000 + data.len()], &data[..]);
        assert!(contents[..0x2000].iter().all(|&b| b == 0xFF));
        assert_eq!(fs::read(&force_ro).unwrap(), b"1");
    }

    #[test]
    fn test_write_without_strategy() {
        let fx = Fixture::new();
        let device = fx.device("sda", 64);
        let input = fx.input(b"bootcmd=run distro_bootcmd\0");

        run_write(&fx.config, &device, &input, 0, true).unwrap();

        let contents = fs::read(&device).unwrap();
        assert!(contents.starts_with(b"bootcmd=run distro_bootcmd\0"));
        assert_eq!(contents.len(), 64);
    }

    #[test]
    fn test_verify_reports_first_mismatch() {
        let fx = Fixture::new();
        let device = fx.device("sda", 16);
        let err = verify_device_with_progress(&device, 4, &[0xFF, 0xFF, 0x00])
            .unwrap_err()
            .to_string();
        assert!(err.contains("0x00000006"), "{}", err);
    }

    #[test]
    fn test_write_to_missing_device_fails() {
        let fx = Fixture::new();
        let input = fx.input(b"x");
        let device = fx.config.dev_root().join("missing");
        assert!(run_write(&fx.config, device.to_str().unwrap(), &input, 0, false).is_err());
        assert!(!device.exists());
    }
}
