//! HTML markup for stat blocks.

use std::fmt::Write as _;

use super::{RenderOutcome, Section, StatBlock};

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One `div.stat-block` card. `link_suffix` is appended to the deep link (session query).
pub fn stat_block_html(block: &StatBlock, link_suffix: &str) -> String {
    let mut html = String::from("<div class=\"stat-block\">\n");
    let title = escape(&block.title);
    match &block.link {
        Some(link) => {
            let _ = writeln!(
                html,
                "<h2><a href=\"{}{}\">{title}</a></h2>",
                escape(link),
                escape(link_suffix)
            );
        }
        None => {
            let _ = writeln!(html, "<h2>{title}</h2>");
        }
    }

    let mut separated = false;
    for section in &block.sections {
        match section {
            Section::SizeType { text } => {
                let _ = writeln!(html, "<p class=\"size-type\">{}</p>", escape(text));
            }
            Section::Field(field) => {
                if !separated {
                    html.push_str("<div class=\"separator\"></div>\n");
                    separated = true;
                }
                let _ = writeln!(
                    html,
                    "<p><strong>{}:</strong> {}</p>",
                    escape(field.label),
                    escape(&field.value)
                );
            }
            Section::AbilityScores { scores } => {
                html.push_str("<div class=\"separator\"></div>\n<ul class=\"ability-scores\">\n");
                for score in scores {
                    let _ = writeln!(
                        html,
                        "<li><h4>{}</h4><p>{}</p></li>",
                        escape(score.label),
                        escape(&score.value)
                    );
                }
                html.push_str("</ul>\n<div class=\"separator\"></div>\n");
            }
            Section::Items { title, items } => {
                html.push_str("<div class=\"items\">\n<div class=\"separator\"></div>\n");
                let _ = writeln!(html, "<h3>{}</h3>", escape(title));
                for item in items {
                    let (name, description) = item.split_once(". ").unwrap_or((item, ""));
                    let _ = writeln!(
                        html,
                        "<div class=\"trait-item\"><p><strong><em>{}.</em></strong> {}</p></div>",
                        escape(name),
                        escape(description)
                    );
                }
                html.push_str("</div>\n");
            }
        }
    }
    html.push_str("</div>\n");
    html
}

/// Inline notice standing in for a record that could not be rendered.
pub fn failure_notice_html(name_jp: &str, error: &str) -> String {
    format!(
        "<div class=\"stat-block render-error\"><p>{} の表示に失敗しました: {}</p></div>\n",
        escape(name_jp),
        escape(error)
    )
}

pub fn outcome_html(outcome: &RenderOutcome, link_suffix: &str) -> String {
    match outcome {
        RenderOutcome::Rendered(block) => stat_block_html(block, link_suffix),
        RenderOutcome::Failed { name_jp, error } => failure_notice_html(name_jp, error),
    }
}
