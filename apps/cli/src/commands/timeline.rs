use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use wb_timeline::Timeline;

use super::{Context, format_secs, measure_session};

pub async fn run(
    ctx: &Context,
    session_id: &str,
    at: &[f64],
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let span = tracing::info_span!("session", session_id = %session_id);
    let measured = measure_session(ctx, session_id, cancel)
        .instrument(span)
        .await?;
    let timeline = Timeline::reconstruct(measured.total, &measured.estimates);
    let items = &measured.snapshot.dialogue_list;

    println!(
        "{} lines, merged {}, gap {:.3}s, scale {:.4}",
        timeline.len(),
        if measured.total > 0.0 {
            format_secs(measured.total)
        } else {
            "unknown".to_string()
        },
        timeline.scaled_gap(),
        timeline.scale()
    );

    for (range, item) in timeline.ranges().iter().zip(items) {
        println!(
            "{} - {}  #{:<3} {}: {}",
            format_secs(range.start),
            format_secs(range.end),
            item.index,
            item.character,
            item.text
        );
    }

    for &t in at {
        match timeline.locate(t) {
            Some(position) => println!(
                "at {} -> line {} ({:.0}%)",
                format_secs(t),
                position.index,
                position.progress * 100.0
            ),
            None => println!("at {} -> nothing", format_secs(t)),
        }
    }
    Ok(())
}
