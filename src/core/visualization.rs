use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::Context;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use uuid::Uuid;

use super::models::{ChartArtifacts, MatchResult};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const MATCHED_COLOR: &str = "green";
const MISSING_COLOR: &str = "red";

const BAR_WIDTH: f64 = 36.0;
const BAR_GAP: f64 = 16.0;
const PLOT_LEFT: f64 = 70.0;
const PLOT_TOP: f64 = 60.0;
const PLOT_HEIGHT: f64 = 220.0;

const PIE_SIZE: f64 = 360.0;
const PIE_RADIUS: f64 = 130.0;
const PIE_START_DEGREES: f64 = 140.0;

type SvgWriter = Writer<Vec<u8>>;

#[derive(Debug, Clone)]
pub struct SvgChartSink {
    output_dir: PathBuf,
}

impl SvgChartSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub async fn publish(
        &self,
        request_id: Uuid,
        result: &MatchResult,
    ) -> anyhow::Result<ChartArtifacts> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| {
                format!("failed to create chart directory {}", self.output_dir.display())
            })?;

        let bar_chart = self.output_dir.join(format!("{request_id}-bar_chart.svg"));
        let pie_chart = self.output_dir.join(format!("{request_id}-pie_chart.svg"));

        tokio::fs::write(&bar_chart, render_bar_chart(result)?)
            .await
            .with_context(|| format!("failed to write {}", bar_chart.display()))?;
        tokio::fs::write(&pie_chart, render_pie_chart(result.percentage)?)
            .await
            .with_context(|| format!("failed to write {}", pie_chart.display()))?;

        tracing::debug!(
            bar_chart = %bar_chart.display(),
            pie_chart = %pie_chart.display(),
            "charts written"
        );

        Ok(ChartArtifacts {
            bar_chart,
            pie_chart,
        })
    }
}

pub fn render_bar_chart(result: &MatchResult) -> anyhow::Result<String> {
    let bars: Vec<(&str, bool)> = result
        .matched_skills
        .iter()
        .map(|skill| (skill.as_str(), true))
        .chain(result.missing_skills.iter().map(|skill| (skill.as_str(), false)))
        .collect();

    let plot_width = (bars.len().max(1) as f64) * (BAR_WIDTH + BAR_GAP) + BAR_GAP;
    let width = (PLOT_LEFT + plot_width + 40.0).max(420.0);
    let height = PLOT_TOP + PLOT_HEIGHT + 130.0;
    let baseline = PLOT_TOP + PLOT_HEIGHT;

    let mut writer = svg_document(width, height)?;
    text(
        &mut writer,
        &[("x", fmt(width / 2.0)), ("y", fmt(30.0)), ("text-anchor", "middle".into())],
        "Matched & Missing Skills (Matched First)",
    )?;
    text(
        &mut writer,
        &[
            ("x", fmt(20.0)),
            ("y", fmt(PLOT_TOP + PLOT_HEIGHT / 2.0)),
            ("transform", format!("rotate(-90 20 {})", fmt(PLOT_TOP + PLOT_HEIGHT / 2.0))),
            ("text-anchor", "middle".into()),
        ],
        "Presence",
    )?;
    empty(
        &mut writer,
        "line",
        &[
            ("x1", fmt(PLOT_LEFT)),
            ("y1", fmt(baseline)),
            ("x2", fmt(PLOT_LEFT + plot_width)),
            ("y2", fmt(baseline)),
            ("stroke", "black".into()),
        ],
    )?;

    for (index, (skill, matched)) in bars.iter().enumerate() {
        let x = PLOT_LEFT + BAR_GAP + index as f64 * (BAR_WIDTH + BAR_GAP);
        let class = if *matched { "bar matched" } else { "bar missing" };
        let color = if *matched { MATCHED_COLOR } else { MISSING_COLOR };
        empty(
            &mut writer,
            "rect",
            &[
                ("class", class.into()),
                ("data-skill", (*skill).into()),
                ("x", fmt(x)),
                ("y", fmt(PLOT_TOP)),
                ("width", fmt(BAR_WIDTH)),
                ("height", fmt(PLOT_HEIGHT)),
                ("fill", color.into()),
            ],
        )?;

        let label_x = x + BAR_WIDTH / 2.0;
        let label_y = baseline + 16.0;
        text(
            &mut writer,
            &[
                ("x", fmt(label_x)),
                ("y", fmt(label_y)),
                ("text-anchor", "end".into()),
                ("transform", format!("rotate(-45 {} {})", fmt(label_x), fmt(label_y))),
            ],
            skill,
        )?;
    }

    text(
        &mut writer,
        &[
            ("x", fmt(PLOT_LEFT + plot_width / 2.0)),
            ("y", fmt(height - 12.0)),
            ("text-anchor", "middle".into()),
        ],
        "Skills",
    )?;

    finish(writer)
}

pub fn render_pie_chart(percentage: f64) -> anyhow::Result<String> {
    let matched = percentage.clamp(0.0, 100.0);
    let center = PIE_SIZE / 2.0;
    let cy = center + 10.0;

    let mut writer = svg_document(PIE_SIZE, PIE_SIZE + 20.0)?;
    text(
        &mut writer,
        &[("x", fmt(center)), ("y", fmt(24.0)), ("text-anchor", "middle".into())],
        "Resume Match Percentage",
    )?;

    let slices = [
        ("Matched", matched, MATCHED_COLOR),
        ("Not Matched", 100.0 - matched, MISSING_COLOR),
    ];

    let mut start = PIE_START_DEGREES;
    for (label, share, color) in slices {
        if share <= 0.0 {
            continue;
        }

        if share >= 100.0 {
            empty(
                &mut writer,
                "circle",
                &[
                    ("class", "slice".into()),
                    ("data-label", label.into()),
                    ("cx", fmt(center)),
                    ("cy", fmt(cy)),
                    ("r", fmt(PIE_RADIUS)),
                    ("fill", color.into()),
                ],
            )?;
        } else {
            let sweep = share / 100.0 * 360.0;
            let (x1, y1) = polar(center, cy, PIE_RADIUS, start);
            let (x2, y2) = polar(center, cy, PIE_RADIUS, start + sweep);
            let large_arc = if sweep > 180.0 { 1 } else { 0 };
            let path = format!(
                "M {} {} L {} {} A {r} {r} 0 {large_arc} 0 {} {} Z",
                fmt(center),
                fmt(cy),
                fmt(x1),
                fmt(y1),
                fmt(x2),
                fmt(y2),
                r = fmt(PIE_RADIUS),
            );
            empty(
                &mut writer,
                "path",
                &[
                    ("class", "slice".into()),
                    ("data-label", label.into()),
                    ("d", path),
                    ("fill", color.into()),
                ],
            )?;
        }

        let (lx, ly) = polar(center, cy, PIE_RADIUS * 0.6, start + share / 100.0 * 180.0);
        text(
            &mut writer,
            &[
                ("x", fmt(lx)),
                ("y", fmt(ly)),
                ("text-anchor", "middle".into()),
                ("fill", "white".into()),
            ],
            &format!("{share:.1}%"),
        )?;
        let (nx, ny) = polar(center, cy, PIE_RADIUS * 1.12, start + share / 100.0 * 180.0);
        text(
            &mut writer,
            &[("x", fmt(nx)), ("y", fmt(ny)), ("text-anchor", "middle".into())],
            label,
        )?;

        start += share / 100.0 * 360.0;
    }

    finish(writer)
}

fn polar(cx: f64, cy: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees * PI / 180.0;
    (cx + radius * radians.cos(), cy - radius * radians.sin())
}

fn fmt(value: f64) -> String {
    format!("{value:.1}")
}

fn svg_document(width: f64, height: f64) -> anyhow::Result<SvgWriter> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let view_box = format!("0 0 {} {}", fmt(width), fmt(height));
    writer.write_event(Event::Start(tag(
        "svg",
        &[
            ("xmlns", SVG_NS.into()),
            ("width", fmt(width)),
            ("height", fmt(height)),
            ("viewBox", view_box),
            ("font-family", "sans-serif".into()),
            ("font-size", "12".into()),
        ],
    )))?;
    Ok(writer)
}

fn finish(mut writer: SvgWriter) -> anyhow::Result<String> {
    writer.write_event(Event::End(BytesEnd::new("svg")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn tag<'a>(name: &'a str, attributes: &'a [(&'a str, String)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for (key, value) in attributes {
        start.push_attribute((*key, value.as_str()));
    }
    start
}

fn empty(writer: &mut SvgWriter, name: &str, attributes: &[(&str, String)]) -> anyhow::Result<()> {
    writer.write_event(Event::Empty(tag(name, attributes)))?;
    Ok(())
}

fn text(writer: &mut SvgWriter, attributes: &[(&str, String)], content: &str) -> anyhow::Result<()> {
    writer.write_event(Event::Start(tag("text", attributes)))?;
    writer.write_event(Event::Text(BytesText::new(content)))?;
    writer.write_event(Event::End(BytesEnd::new("text")))?;
    Ok(())
}
