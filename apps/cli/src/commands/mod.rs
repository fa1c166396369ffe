pub mod export;
pub mod follow;
pub mod health;
pub mod preview;
pub mod sessions;
pub mod timeline;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use wb_dialogue::SessionSnapshot;
use wb_probe::{DurationProber, ObjectUrls, RodioLoader};
use wb_workbench_client::{ClientEnv, ReqwestHttp, WorkbenchClient};

pub type Client = WorkbenchClient<ReqwestHttp>;
pub type Prober = DurationProber<Arc<Client>, RodioLoader<Arc<Client>>>;

pub struct Context {
    pub env: ClientEnv,
    pub client: Arc<Client>,
}

impl Context {
    pub fn new(env: ClientEnv) -> anyhow::Result<Self> {
        let http = ReqwestHttp::from_env(&env)?;
        let client = Arc::new(WorkbenchClient::new(http, env.api_base.clone()));
        Ok(Self { env, client })
    }

    pub fn prober(&self) -> Prober {
        let object_urls = ObjectUrls::new();
        DurationProber::new(
            self.env.probe_config(),
            self.client.clone(),
            RodioLoader::new(self.client.clone(), object_urls.clone()),
            object_urls,
        )
    }
}

/// A session with clip estimates and the merged length resolved.
pub struct Measured {
    pub snapshot: SessionSnapshot,
    pub estimates: Vec<f64>,
    /// Merged track length in seconds, `0` when unknown.
    pub total: f64,
}

/// Fetches a session and probes its audio. Ctrl-C aborts the probe batch.
pub async fn measure_session(
    ctx: &Context,
    session_id: &str,
    cancel: &CancellationToken,
) -> anyhow::Result<Measured> {
    let snapshot = ctx.client.get_session(session_id).await?;
    let prober = ctx.prober();

    let urls: Vec<String> = ctx
        .client
        .clips(&snapshot)
        .into_iter()
        .map(|clip| clip.url)
        .collect();
    let probed = prober.probe_all(&urls, cancel).await?;
    let estimates = wb_timeline::resolve_estimates(&snapshot.dialogue_list, &probed);

    let total = match snapshot.merged_duration_secs() {
        Some(secs) => secs,
        None => match ctx.client.require_merged_audio(&snapshot) {
            Ok(url) => tokio::select! {
                _ = cancel.cancelled() => return Err(wb_probe::Cancelled.into()),
                measured = prober.measure(&url) => measured.unwrap_or_else(|error| {
                    tracing::warn!(%error, "merged_duration_unknown");
                    0.0
                }),
            },
            Err(error) => {
                tracing::info!(%error, "merged_duration_unknown");
                0.0
            }
        },
    };

    tracing::debug!(
        probe_objects = prober.object_urls().created(),
        released = prober.object_urls().revoked(),
        "probe_objects"
    );

    Ok(Measured {
        snapshot,
        estimates,
        total,
    })
}

pub fn format_secs(secs: f64) -> String {
    let secs = secs.max(0.0);
    let minutes = (secs / 60.0).floor();
    format!("{:02}:{:05.2}", minutes as u64, secs - minutes * 60.0)
}
