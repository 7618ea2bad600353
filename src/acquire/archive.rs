//! Source acquisition from dist archives.
//!
//! Archives are served at
//! `<base>/<organization>/<subrepo>/dists/<package>/<label>/r<reference>.<type>`
//! behind HTTP basic auth, downloaded into a scoped temp file and unpacked
//! with `unzip`.

use anyhow::{anyhow, Context};
use reqwest::blocking::Client;
use std::path::Path;
use std::time::Duration;

use crate::error::{CompatError, Result};
use crate::shell::{ToolInvocation, ToolRunner};

/// Production dist host.
pub const DEFAULT_REPO_URL: &str = "https://repo.packagist.com";

/// Basic-auth pair for dist downloads.
#[derive(Clone)]
pub struct DistCredentials {
    pub user: String,
    pub key: String,
}

impl std::fmt::Debug for DistCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistCredentials")
            .field("user", &self.user)
            .field("key", &"***")
            .finish()
    }
}

/// Where dist archives for a run live.
#[derive(Debug, Clone)]
pub struct DistLocation {
    /// Repository host root, normally [`DEFAULT_REPO_URL`].
    pub base_url: String,
    /// Organization id.
    pub organization: String,
    /// Subrepository id.
    pub subrepo: String,
}

impl DistLocation {
    /// URL of the `kind` archive of `package` at `label`.
    pub fn dist_url(&self, package: &str, label: &str, reference: &str, kind: &str) -> String {
        format!(
            "{}/{}/{}/dists/{}/{}/r{}.{}",
            self.base_url.trim_end_matches('/'),
            self.organization,
            self.subrepo,
            package,
            label,
            reference,
            kind
        )
    }
}

/// Downloads and unpacks dist archives.
pub struct ArchiveFetcher {
    client: Client,
    location: DistLocation,
    credentials: Option<DistCredentials>,
}

impl ArchiveFetcher {
    /// Default download timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    /// Create a fetcher.
    pub fn new(
        location: DistLocation,
        credentials: Option<DistCredentials>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("compat-check/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            location,
            credentials,
        })
    }

    /// Dist location in use.
    pub fn location(&self) -> &DistLocation {
        &self.location
    }

    /// Download the zip archive of `package` at `label` and extract it into `dest`.
    ///
    /// The downloaded file is deleted before returning, whatever the outcome.
    pub fn fetch_into(
        &self,
        runner: &dyn ToolRunner,
        package: &str,
        label: &str,
        scratch_dir: &Path,
        dest: &Path,
        unzip_timeout: Duration,
    ) -> Result<()> {
        let url = self.location.dist_url(package, label, "", "zip");

        std::fs::create_dir_all(scratch_dir)?;
        let mut archive = tempfile::Builder::new()
            .prefix("pcc")
            .suffix(".zip")
            .tempfile_in(scratch_dir)?;

        self.download(&url, archive.as_file_mut())?;
        extract_zip(runner, archive.path(), dest, unzip_timeout)
    }

    fn download(&self, url: &str, out: &mut std::fs::File) -> Result<()> {
        tracing::debug!("Downloading {}", url);

        let mut request = self.client.get(url);
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.user, Some(&creds.key));
        }

        let mut response = request
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {} fetching {}", response.status(), url).into());
        }

        response
            .copy_to(out)
            .with_context(|| format!("Failed to write archive from {}", url))?;
        Ok(())
    }
}

/// Unpack `archive` into `dest` with `unzip`.
pub fn extract_zip(
    runner: &dyn ToolRunner,
    archive: &Path,
    dest: &Path,
    timeout: Duration,
) -> Result<()> {
    let invocation = ToolInvocation::new("unzip", timeout).args([
        "-q".to_string(),
        "-o".to_string(),
        archive.to_string_lossy().to_string(),
        "-d".to_string(),
        dest.to_string_lossy().to_string(),
    ]);

    let output = runner.run(&invocation)?;
    if !output.success {
        return Err(CompatError::CommandFailed {
            command: invocation.display(),
            code: output.exit_code,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ScriptedRunner;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn location(base: &str) -> DistLocation {
        DistLocation {
            base_url: base.to_string(),
            organization: "acme-org".to_string(),
            subrepo: "acme".to_string(),
        }
    }

    #[test]
    fn dist_url_template() {
        let url = location(DEFAULT_REPO_URL).dist_url("acme/billing", "dev-master", "", "zip");
        assert_eq!(
            url,
            "https://repo.packagist.com/acme-org/acme/dists/acme/billing/dev-master/r.zip"
        );
    }

    #[test]
    fn dist_url_with_reference() {
        let url = location("https://repo.example.com/").dist_url("a/b", "1.0.0.0", "abc", "tar");
        assert_eq!(
            url,
            "https://repo.example.com/acme-org/acme/dists/a/b/1.0.0.0/rabc.tar"
        );
    }

    #[test]
    fn fetch_downloads_with_basic_auth_and_extracts() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/acme-org/acme/dists/acme/billing/2.0.0.0/r.zip")
                .header_exists("Authorization");
            then.status(200).body("PK fake zip");
        });

        let temp = TempDir::new().unwrap();
        let fetcher = ArchiveFetcher::new(
            location(&server.base_url()),
            Some(DistCredentials {
                user: "token".into(),
                key: "secret".into(),
            }),
            Duration::from_secs(5),
        )
        .unwrap();
        let runner = ScriptedRunner::succeeding();
        let dest = temp.path().join("src");

        fetcher
            .fetch_into(
                &runner,
                "acme/billing",
                "2.0.0.0",
                temp.path(),
                &dest,
                Duration::from_secs(5),
            )
            .unwrap();

        mock.assert();
        let calls = runner.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "unzip");
        assert_eq!(calls[0].args.last().unwrap(), &dest.to_string_lossy().to_string());

        // The temp archive is gone once fetch_into returns.
        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".zip"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn missing_archive_is_error_without_extraction() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(404).body("Not Found");
        });

        let temp = TempDir::new().unwrap();
        let fetcher =
            ArchiveFetcher::new(location(&server.base_url()), None, Duration::from_secs(5))
                .unwrap();
        let runner = ScriptedRunner::succeeding();

        let err = fetcher
            .fetch_into(
                &runner,
                "acme/billing",
                "dev-main",
                temp.path(),
                &temp.path().join("src"),
                Duration::from_secs(5),
            )
            .unwrap_err();

        assert!(err.to_string().contains("404"));
        assert_eq!(runner.total(), 0);
    }
}
