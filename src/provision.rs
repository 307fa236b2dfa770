//! Browser and driver provisioning.
//!
//! Before any navigation, the run validates that a Chrome binary and a
//! version-matched chromedriver are installed, installing whatever is
//! missing. Policy, in order:
//!
//! 1. check a fixed list of well-known browser install locations;
//! 2. if none exist, scrape the vendor download page for the installer URL,
//!    download it, and run the installer silently;
//! 3. read the browser's self-reported version from its profile metadata
//!    (two locations checked in order, error string as the fallback);
//! 4. check the well-known driver locations; if none exist, download the
//!    version-matched driver archive, extract it, and place the binary in a
//!    well-known directory.
//!
//! Unlike the per-article extraction failures downstream, provisioning
//! failures are fatal: without a working browser there is no run.

use std::error::Error;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use tracing::{error, info, instrument, warn};

static INSTALLER_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    if cfg!(windows) {
        Regex::new(r"https://dl\.google\.com/[^\s'\x22]*?ChromeSetup\.exe").unwrap()
    } else {
        Regex::new(r"https://dl\.google\.com/[^\s'\x22]*?google-chrome-stable_current_amd64\.deb")
            .unwrap()
    }
});

const VENDOR_DOWNLOAD_PAGE: &str = "https://www.google.com/chrome/";

fn browser_paths() -> Vec<PathBuf> {
    if cfg!(windows) {
        vec![
            PathBuf::from("C:/Program Files (x86)/Google/Chrome/Application/chrome.exe"),
            PathBuf::from("C:/Program Files/Google/Chrome/Application/chrome.exe"),
        ]
    } else {
        vec![
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/opt/google/chrome/chrome"),
        ]
    }
}

fn driver_paths() -> Vec<PathBuf> {
    if cfg!(windows) {
        vec![
            PathBuf::from("C:/ProgramData/chromedriver.exe"),
            PathBuf::from("C:/Program Files/WebDriver/chromedriver.exe"),
        ]
    } else {
        vec![
            PathBuf::from("/usr/local/bin/chromedriver"),
            PathBuf::from("/opt/chromedriver/chromedriver"),
        ]
    }
}

fn driver_install_dir() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("C:/ProgramData")
    } else {
        PathBuf::from("/usr/local/bin")
    }
}

/// Locations of the browser's self-reported version metadata, checked in
/// order.
fn version_metadata_paths() -> Vec<PathBuf> {
    if cfg!(windows) {
        let local = std::env::var("LOCALAPPDATA").unwrap_or_default();
        vec![
            PathBuf::from(&local).join("Google/Chrome/User Data/Last Version"),
            PathBuf::from(&local).join("Chromium/User Data/Last Version"),
        ]
    } else {
        let home = std::env::var("HOME").unwrap_or_default();
        vec![
            PathBuf::from(&home).join(".config/google-chrome/Last Version"),
            PathBuf::from(&home).join(".config/chromium/Last Version"),
        ]
    }
}

/// Ensure browser and driver are both present, installing what is missing.
///
/// Returns the browser binary path for the navigator to launch.
#[instrument(level = "info", skip(client))]
pub fn ensure_ready(client: &Client) -> Result<PathBuf, Box<dyn Error>> {
    let browser = ensure_browser_ready(client)?;
    let version = browser_version();
    info!(version, "Browser version");
    ensure_driver_ready(client, &version)?;
    Ok(browser)
}

/// Find the browser at a well-known location, installing it when absent.
pub fn ensure_browser_ready(client: &Client) -> Result<PathBuf, Box<dyn Error>> {
    for path in browser_paths() {
        if path.exists() {
            info!(path = %path.display(), "Browser found");
            return Ok(path);
        }
    }

    info!("Browser not found, installing...");
    install_browser(client)?;

    let default = browser_paths().remove(0);
    Ok(default)
}

/// Download and silently run the vendor installer. The installer URL is
/// scraped out of the vendor download page.
fn install_browser(client: &Client) -> Result<(), Box<dyn Error>> {
    let page = client
        .get(VENDOR_DOWNLOAD_PAGE)
        .send()?
        .error_for_status()?
        .text()?;

    let Some(installer_url) = INSTALLER_URL_PATTERN.find(&page) else {
        error!("Could not find the installer URL on the vendor download page");
        return Err("installer URL not found".into());
    };

    let installer_path = if cfg!(windows) {
        PathBuf::from("ChromeSetup.exe")
    } else {
        PathBuf::from("google-chrome-stable_current_amd64.deb")
    };
    download_file(client, installer_url.as_str(), &installer_path)?;

    let status = if cfg!(windows) {
        Command::new(&installer_path).arg("/silent").arg("/install").status()?
    } else {
        Command::new("dpkg").arg("-i").arg(&installer_path).status()?
    };
    fs::remove_file(&installer_path)?;

    if !status.success() {
        return Err(format!("browser installer exited with {status}").into());
    }
    info!("Browser installed successfully");
    Ok(())
}

/// The browser's self-reported version, or an error string when no
/// metadata location yields one.
pub fn browser_version() -> String {
    version_from_metadata(&version_metadata_paths())
}

fn version_from_metadata(paths: &[PathBuf]) -> String {
    for path in paths {
        match fs::read_to_string(path) {
            Ok(version) => {
                let version = version.trim().to_string();
                if !version.is_empty() {
                    return version;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read version metadata");
            }
        }
    }
    "browser version not found".to_string()
}

/// Find the driver at a well-known location, downloading the
/// version-matched archive when absent.
pub fn ensure_driver_ready(client: &Client, browser_version: &str) -> Result<PathBuf, Box<dyn Error>> {
    for path in driver_paths() {
        if path.exists() {
            info!(path = %path.display(), "Driver found");
            return Ok(path);
        }
    }

    info!(browser_version, "Driver not found, downloading...");
    let archive_url = driver_archive_url(browser_version);
    let archive_path = driver_install_dir().join("chromedriver.zip");
    if let Some(parent) = archive_path.parent() {
        fs::create_dir_all(parent)?;
    }
    download_file(client, &archive_url, &archive_path)?;

    let installed = extract_driver_binary(&archive_path, &driver_install_dir());
    fs::remove_file(&archive_path)?;
    let installed = installed?;
    info!(path = %installed.display(), "Driver installed successfully");
    Ok(installed)
}

/// The version-parameterized driver archive endpoint.
pub fn driver_archive_url(version: &str) -> String {
    let platform = if cfg!(windows) { "win64" } else { "linux64" };
    format!(
        "https://storage.googleapis.com/chrome-for-testing-public/{version}/{platform}/chromedriver-{platform}.zip"
    )
}

/// Pull the driver binary out of the downloaded archive into `dest_dir`.
fn extract_driver_binary(archive_path: &Path, dest_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let binary_name = if cfg!(windows) { "chromedriver.exe" } else { "chromedriver" };

    let mut archive = zip::ZipArchive::new(File::open(archive_path)?)?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(name) = entry.enclosed_name() else { continue };
        if name.file_name().and_then(|n| n.to_str()) != Some(binary_name) {
            continue;
        }

        let dest = dest_dir.join(binary_name);
        let mut out = File::create(&dest)?;
        io::copy(&mut entry, &mut out)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&dest, fs::Permissions::from_mode(0o755))?;
        }
        return Ok(dest);
    }
    Err("driver binary not found in archive".into())
}

/// Stream a download to a local file.
fn download_file(client: &Client, url: &str, dest: &Path) -> Result<(), Box<dyn Error>> {
    let mut response = client.get(url).send()?.error_for_status()?;
    let mut file = File::create(dest)?;
    response.copy_to(&mut file)?;
    info!(url, dest = %dest.display(), "Downloaded file");
    Ok(())
}
