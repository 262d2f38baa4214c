//! Interactive terminal classifier.
//!
//! Digits pick an option for the current image, `r` reloads the queue and
//! `q` (or end of input) quits.

use std::io::Write;

use anyhow::{bail, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::render::render_card;
use crate::workflow::{ClassificationWorkflow, LabelingApi, Phase, Selection};

const SESSION_EXPIRED: &str = "Session expired or missing; run `vai login` first";

pub async fn run_classifier<A, R, W>(
    workflow: &mut ClassificationWorkflow,
    api: &A,
    input: R,
    out: &mut W,
) -> Result<()>
where
    A: LabelingApi,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if let Err(e) = workflow.load(api).await {
        if e.is_auth() {
            bail!(SESSION_EXPIRED);
        }
        bail!("Could not load identifications: {}", e);
    }
    let mut lines = input.lines();

    loop {
        // Terminal output has nothing to fetch, so the image counts as loaded
        // once its URL is printed.
        if workflow.is_image_loading() {
            workflow.image_loaded();
        }
        write!(out, "{}", render_card(workflow))?;
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = line.trim();

        match command {
            "q" => break,
            "r" => match workflow.load(api).await {
                Ok(()) => {}
                Err(e) if e.is_auth() => bail!(SESSION_EXPIRED),
                Err(e) => {
                    writeln!(out, "Could not reload identifications: {}. Try again.", e)?;
                }
            },
            _ => {
                let mut chars = command.chars();
                let key = match (chars.next(), chars.next()) {
                    (Some(key), None) => key,
                    _ => {
                        writeln!(out, "Unknown input '{}'", command)?;
                        continue;
                    }
                };
                if workflow.phase() == Phase::Done {
                    continue;
                }
                match workflow.select_key(api, key).await {
                    Ok(Selection::Ignored) => {
                        writeln!(out, "No option {} for this image", key)?;
                    }
                    Ok(Selection::Answered {
                        auto_nulled,
                        follow_up_error,
                        ..
                    }) => {
                        if auto_nulled > 0 {
                            writeln!(
                                out,
                                "Marked {} dependent identification(s) as not applicable",
                                auto_nulled
                            )?;
                        }
                        if let Some(e) = follow_up_error {
                            if e.is_auth() {
                                bail!(SESSION_EXPIRED);
                            }
                            writeln!(out, "Could not skip a dependent identification: {}", e)?;
                        }
                    }
                    Err(e) if e.is_auth() => bail!(SESSION_EXPIRED),
                    Err(e) => {
                        writeln!(out, "Submission failed: {}. Try again.", e)?;
                    }
                }
            }
        }
    }

    Ok(())
}
