use std::time::Duration;

use console::Style;
use deshake_core::frame::SourceInfo;
use deshake_core::linestart::MergeStats;
use deshake_core::params::ProcessingParameters;
use deshake_core::pipeline::{DeshakeJob, DeshakeSummary};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    warning: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            warning: Style::new().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_job_summary(job: &DeshakeJob, source: &SourceInfo) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("VHS Deshaker"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(12)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(job.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(&job.output)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(format!(
            "{} x {}x{} {}",
            source.total_frames, source.width, source.height, source.layout
        ))
    );
    match job.frame_rate.or(source.frame_rate) {
        Some(fps) => println!(
            "  {:<14}{}",
            s.label.apply_to("Frame rate"),
            s.value.apply_to(format!("{fps:.3} fps"))
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Frame rate"),
            s.warning.apply_to("unknown")
        ),
    }
    println!();

    print_parameters(&s, &job.params);

    if let Some(ref capture) = job.debug {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Debug frame"),
            s.value.apply_to(format!(
                "{} -> {}",
                capture.frame_index,
                capture.dir.display()
            ))
        );
        println!();
    }
}

fn print_parameters(s: &Styles, params: &ProcessingParameters) {
    println!("  {}", s.header.apply_to("Parameters"));
    let rows: [(&str, String); 8] = [
        ("Column range", params.col_range.to_string()),
        ("Target start", params.target_line_start.to_string()),
        ("Black width", params.pure_black_width.to_string()),
        ("Black level", params.pure_black_threshold.to_string()),
        ("Min segment", params.min_line_start_segment_length.to_string()),
        ("Smoothing", params.line_start_smoothing_kernel_size.to_string()),
        ("Edge thresh.", params.edge_threshold.to_string()),
        ("Seg. tolerance", params.segment_tolerance.to_string()),
    ];
    for (label, value) in rows {
        println!("    {:<16}{}", s.label.apply_to(label), s.value.apply_to(value));
    }
    println!();
}

pub fn print_run_summary(summary: &DeshakeSummary, elapsed: Duration) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Result"));
    println!(
        "    {:<16}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(summary.frames_processed)
    );
    if summary.unusable_frames > 0 {
        println!(
            "    {:<16}{}",
            s.label.apply_to("Uncorrected"),
            s.warning.apply_to(format!(
                "{} (no usable border)",
                summary.unusable_frames
            ))
        );
    }
    println!(
        "    {:<16}{}",
        s.label.apply_to("Largest shift"),
        s.value.apply_to(format!("{} px", summary.max_abs_shift))
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Rows"),
        s.value.apply_to(row_sources(&summary.merge))
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Elapsed"),
        s.value.apply_to(format!("{} ms", elapsed.as_millis()))
    );
    println!();
}

/// Where the merged line starts came from, summed over all frames. Rows with
/// no detection on either side are "missing"; they were either filled from
/// neighbouring rows or belong to frames left uncorrected.
fn row_sources(merge: &MergeStats) -> String {
    format!(
        "{} left, {} right, {} averaged, {} missing",
        merge.from_left, merge.from_right, merge.averaged, merge.missing
    )
}
