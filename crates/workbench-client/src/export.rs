use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::Instrument;
use wb_dialogue::{SessionSnapshot, file_name};
use wb_http_utils::HttpClient;

use crate::{Error, WorkbenchClient};

/// Name the backend gives the merged track on download.
pub const MERGED_FILE_NAME: &str = "dialogue_full.mp3";

#[derive(Debug)]
pub struct ExportedFile {
    pub file_name: String,
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug)]
pub struct ExportFailure {
    pub file_name: String,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct ExportReport {
    pub saved: Vec<ExportedFile>,
    pub failed: Vec<ExportFailure>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl<C: HttpClient> WorkbenchClient<C> {
    /// Downloads every line clip plus the merged track into `dir`.
    ///
    /// Files are fetched one after another and each one succeeds or fails on
    /// its own; only failing to create `dir` aborts the export. A file whose
    /// final name is blank or already taken by an earlier file fails instead
    /// of overwriting.
    pub async fn export_audio(
        &self,
        snapshot: &SessionSnapshot,
        dir: &Path,
    ) -> Result<ExportReport, Error> {
        let span = tracing::info_span!("session", session_id = %snapshot.session_id);

        async {
            tokio::fs::create_dir_all(dir).await?;

            let mut targets: Vec<(String, String)> = snapshot
                .audio_files
                .iter()
                .map(|path| {
                    (
                        file_name(path).to_string(),
                        self.audio_url(&snapshot.session_id, path),
                    )
                })
                .collect();
            if snapshot.merged_audio.is_some() {
                targets.push((
                    MERGED_FILE_NAME.to_string(),
                    self.merged_audio_url(&snapshot.session_id),
                ));
            }

            let mut report = ExportReport::default();
            let mut taken = HashSet::new();
            for (name, url) in targets {
                match self.save_one(&url, dir, &name, &mut taken).await {
                    Ok(file) => report.saved.push(file),
                    Err(error) => {
                        tracing::warn!(file = %name, %error, "export_file_failed");
                        report.failed.push(ExportFailure {
                            file_name: name,
                            error,
                        });
                    }
                }
            }

            tracing::info!(
                saved = report.saved.len(),
                failed = report.failed.len(),
                "export_finished"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }

    async fn save_one(
        &self,
        url: &str,
        dir: &Path,
        name: &str,
        taken: &mut HashSet<String>,
    ) -> Result<ExportedFile, Error> {
        if !is_valid_file_name(name) {
            return Err(Error::InvalidFileName(name.to_string()));
        }

        let bytes = self.fetch_audio(url).await?;
        let file_name = wb_audio_mime::ensure_extension(name, &bytes);
        if !taken.insert(file_name.clone()) {
            return Err(Error::DuplicateFileName(file_name));
        }
        let path = dir.join(&file_name);
        tokio::fs::write(&path, &bytes).await?;

        Ok(ExportedFile {
            file_name,
            path,
            bytes: bytes.len(),
        })
    }
}

fn is_valid_file_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name != "." && name != ".."
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::ReqwestHttp;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            session_id: "s-1".into(),
            audio_files: vec![
                "/out/s-1/dialogue_000_A.mp3".into(),
                "/out/s-1/dialogue_001_B".into(),
                "/out/s-1/dialogue_002_A.mp3".into(),
            ],
            merged_audio: Some("/out/s-1/dialogue_full.mp3".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn failures_do_not_abort_the_batch() {
        let server = MockServer::start().await;
        let mp3 = vec![0x49, 0x44, 0x33, 0x04, 0x00];
        for file in ["dialogue_000_A.mp3", "dialogue_001_B"] {
            Mock::given(method("GET"))
                .and(path(format!("/api/tts/audio/s-1/{file}")))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(mp3.clone()))
                .mount(&server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/api/tts/audio/s-1/dialogue_002_A.mp3"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tts/sessions/s-1/merged-audio"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(mp3.clone()))
            .mount(&server)
            .await;

        let base = format!("{}/api/tts", server.uri());
        let http = ReqwestHttp::new(base.clone(), None, Duration::from_secs(5)).unwrap();
        let client = WorkbenchClient::new(http, base);

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("export");
        let report = client.export_audio(&snapshot(), &out).await.unwrap();

        let saved: Vec<_> = report.saved.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(
            saved,
            vec!["dialogue_000_A.mp3", "dialogue_001_B.mp3", MERGED_FILE_NAME]
        );
        assert!(!report.is_complete());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].file_name, "dialogue_002_A.mp3");

        assert_eq!(std::fs::read(out.join(MERGED_FILE_NAME)).unwrap(), mp3);
        assert!(!out.join("dialogue_002_A.mp3").exists());
    }

    #[tokio::test]
    async fn colliding_and_blank_names_fail_without_overwriting() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tts/audio/s-1/line.mp3"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3first".to_vec()))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tts/audio/s-1/line.mp3"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3second".to_vec()))
            .mount(&server)
            .await;

        let base = format!("{}/api/tts", server.uri());
        let http = ReqwestHttp::new(base.clone(), None, Duration::from_secs(5)).unwrap();
        let client = WorkbenchClient::new(http, base);
        let snapshot = SessionSnapshot {
            session_id: "s-1".into(),
            audio_files: vec![
                "/out/take-1/line.mp3".into(),
                "/out/take-2/line.mp3".into(),
                "/out/s-1/".into(),
            ],
            ..Default::default()
        };

        let dir = tempfile::tempdir().unwrap();
        let report = client.export_audio(&snapshot, dir.path()).await.unwrap();

        let saved: Vec<_> = report.saved.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(saved, vec!["line.mp3"]);
        assert_eq!(report.failed.len(), 2);
        assert!(matches!(
            &report.failed[0].error,
            Error::DuplicateFileName(name) if name == "line.mp3"
        ));
        assert!(matches!(
            &report.failed[1].error,
            Error::InvalidFileName(name) if name.is_empty()
        ));

        assert_eq!(std::fs::read(dir.path().join("line.mp3")).unwrap(), b"ID3first");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn dot_names_are_invalid() {
        assert!(is_valid_file_name("dialogue_000_A.mp3"));
        assert!(!is_valid_file_name(""));
        assert!(!is_valid_file_name("  "));
        assert!(!is_valid_file_name("."));
        assert!(!is_valid_file_name(".."));
    }

    #[tokio::test]
    async fn session_without_audio_exports_nothing() {
        let http = ReqwestHttp::new("http://127.0.0.1:9/api/tts", None, Duration::from_secs(1))
            .unwrap();
        let client = WorkbenchClient::new(http, "http://127.0.0.1:9/api/tts");

        let dir = tempfile::tempdir().unwrap();
        let report = client
            .export_audio(
                &SessionSnapshot {
                    session_id: "empty".into(),
                    ..Default::default()
                },
                dir.path(),
            )
            .await
            .unwrap();
        assert!(report.is_complete());
        assert!(report.saved.is_empty());
    }
}
