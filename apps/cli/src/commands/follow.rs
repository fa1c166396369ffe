use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use wb_dialogue::DialogueItem;
use wb_playback::{Controller, Event, PlaybackDriver, Source, UiUpdate};

use super::{Context, format_secs, measure_session};
use crate::player::ClockPlayer;

const TICK: Duration = Duration::from_millis(250);

pub async fn run(
    ctx: &Context,
    session_id: &str,
    item: Option<usize>,
    speed: f64,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    if !(speed.is_finite() && speed > 0.0) {
        anyhow::bail!("speed must be positive, got {speed}");
    }

    let span = tracing::info_span!("session", session_id = %session_id);
    let measured = measure_session(ctx, session_id, cancel)
        .instrument(span)
        .await?;
    let items = measured.snapshot.dialogue_list;

    let controller = Controller::new(measured.estimates.clone(), measured.total);
    let merged_length = if measured.total > 0.0 {
        measured.total
    } else {
        controller.timeline().end()
    };
    let merged = ClockPlayer::new(merged_length, speed);
    let players = measured
        .estimates
        .iter()
        .map(|&secs| ClockPlayer::new(secs, speed))
        .collect();
    let mut driver = PlaybackDriver::new(controller, merged, players);

    let start = match item {
        Some(index) => Event::PlayItem(index),
        None => Event::PlayMerged,
    };
    driver.dispatch(start).await;
    if let Some(index) = item
        && let Some(line) = items.get(index)
        && driver.view().highlighted == Some(index)
    {
        println!("playing #{} {}: {}", line.index, line.character, line.text);
    }
    render(&mut driver, &items);

    let mut ticker = tokio::time::interval(TICK);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                driver.dispatch(Event::Pause).await;
                println!("paused");
                break;
            }
            _ = driver.fire_next_timer() => {}
            _ = ticker.tick() => {
                let view = driver.view();
                let Some(source) = view.active else {
                    if view.highlighted.is_none() {
                        break;
                    }
                    continue;
                };
                let Some(player) = driver.player(source) else {
                    break;
                };

                let event = if player.has_ended() {
                    Event::Ended(source)
                } else {
                    Event::TimeUpdate {
                        source,
                        time: player.current_time(),
                        duration: player.duration(),
                    }
                };
                driver.dispatch(event).await;
            }
        }
        render(&mut driver, &items);
    }

    Ok(())
}

fn render(driver: &mut PlaybackDriver<ClockPlayer>, items: &[DialogueItem]) {
    for update in driver.take_ui_updates() {
        match update {
            UiUpdate::ScrollIntoView(index) => {
                let start = driver
                    .controller()
                    .timeline()
                    .range(index)
                    .map(|range| range.start)
                    .unwrap_or_default();
                match items.get(index) {
                    Some(item) => println!(
                        "{}  #{:<3} {}: {}",
                        format_secs(start),
                        item.index,
                        item.character,
                        item.text
                    ),
                    None => println!("{}  #{index}", format_secs(start)),
                }
            }
            UiUpdate::Notify { source, message } => {
                let target = match source {
                    Source::Merged => "merged track".to_string(),
                    Source::Item(index) => format!("line {index}"),
                };
                eprintln!("cannot play {target}: {message}");
            }
        }
    }
}
