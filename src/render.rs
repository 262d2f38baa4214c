//! Plain-text rendering for console output.

use crate::models::{Camera, Identification, ObjectDefinition, Prompt};
use crate::workflow::{ClassificationWorkflow, Phase};

/// Render rows as left-aligned columns separated by two spaces.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut output, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut output, &rule, &widths);
    for row in rows {
        push_row(&mut output, row, &widths);
    }
    output
}

fn push_row(output: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect();
    output.push_str(line.join("  ").trim_end());
    output.push('\n');
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

pub fn render_cameras(cameras: &[Camera]) -> String {
    let rows: Vec<Vec<String>> = cameras
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                or_dash(c.name.as_deref()),
                format!("{:.5}", c.latitude),
                format!("{:.5}", c.longitude),
                c.objects.join(", "),
            ]
        })
        .collect();
    render_table(&["ID", "NAME", "LAT", "LON", "OBJECTS"], &rows)
}

pub fn render_objects(objects: &[ObjectDefinition]) -> String {
    let rows: Vec<Vec<String>> = objects
        .iter()
        .map(|o| {
            let labels: Vec<&str> = o.labels.iter().map(|l| l.value.as_str()).collect();
            vec![o.slug.clone(), o.name.clone(), labels.join(", ")]
        })
        .collect();
    render_table(&["SLUG", "NAME", "LABELS"], &rows)
}

pub fn render_prompts(prompts: &[Prompt]) -> String {
    let rows: Vec<Vec<String>> = prompts
        .iter()
        .map(|p| vec![p.name.clone(), p.model.clone(), p.objects.join(", ")])
        .collect();
    render_table(&["NAME", "MODEL", "OBJECTS"], &rows)
}

pub fn render_identifications(items: &[Identification]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|i| {
            vec![
                i.id.to_string(),
                i.object.clone(),
                or_dash(i.label.as_deref()),
                i.snapshot.image_url.clone(),
            ]
        })
        .collect();
    render_table(&["ID", "OBJECT", "AI LABEL", "IMAGE"], &rows)
}

/// Render the current classification task.
///
/// Example output:
/// ```text
/// Image 3 of 40
/// https://storage.example.com/snapshots/abc.png
///
/// Is there water on the road?
/// Explanation: Look for puddles or flooding.
///
/// 1. Low
/// 2. Medium
/// 3. High
/// ```
pub fn render_card(workflow: &ClassificationWorkflow) -> String {
    match workflow.phase() {
        Phase::Loading => return "Loading identifications...\n".to_string(),
        Phase::Done => {
            return "All images have been reviewed. Press r to load new identifications.\n"
                .to_string()
        }
        Phase::Ready | Phase::Submitting => {}
    }
    let Some(item) = workflow.current() else {
        return String::new();
    };

    let (position, total) = workflow.progress();
    let mut output = format!("Image {} of {}\n", position, total);
    if workflow.is_image_loading() {
        output.push_str("[loading image...]\n");
    } else {
        output.push_str(item.image_url());
        output.push('\n');
    }
    output.push('\n');

    if let Some(question) = item.question.as_deref() {
        output.push_str(question);
        output.push('\n');
    }
    if let Some(explanation) = item.explanation.as_deref() {
        output.push_str(&format!("Explanation: {}\n", explanation));
    }
    output.push('\n');

    for (i, option) in workflow.current_options().iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, option.text));
    }
    output
}
