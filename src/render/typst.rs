// src/render/typst.rs
//! Typst source for the resume; Typst takes care of page breaks

use super::{DocumentView, Section};

const GRAY: &str = "#666666";
const BLUE: &str = "#1F79C7";

pub fn render(view: &DocumentView) -> String {
    let mut out = String::new();
    out.push_str("#set page(paper: \"a4\", margin: (x: 25pt, top: 25pt, bottom: 55pt))\n");
    out.push_str("#set text(size: 9pt)\n");
    out.push_str("#set par(leading: 0.75em)\n");
    out.push_str(&format!("#let muted = rgb(\"{GRAY}\")\n"));
    out.push_str(&format!("#let accent = rgb(\"{BLUE}\")\n"));
    out.push('\n');

    out.push_str("#grid(\n  columns: (7fr, 3fr),\n  column-gutter: 40pt,\n  [\n");
    out.push_str(&format!(
        "    #block(height: 50pt)[#text(size: 32pt, weight: \"semibold\")[{}] \\\n    #text(fill: muted, weight: \"semibold\")[{}]]\n",
        lit(&view.name),
        lit(&view.job_title)
    ));
    for section in &view.main {
        write_main_section(&mut out, section);
    }

    out.push_str("  ],\n  [\n    #block(height: 50pt)[\n");
    for line in &view.contact {
        out.push_str(&format!("      #text(fill: muted)[{}] \\\n", lit(line)));
    }
    out.push_str("    ]\n");
    for section in &view.side {
        write_side_section(&mut out, section);
    }
    out.push_str("  ],\n)\n");
    out
}

fn write_main_section(out: &mut String, section: &Section) {
    out.push_str(&format!(
        "    #block(below: 16pt)[\n      #text(fill: accent, weight: \"bold\")[{}]\n",
        section.heading
    ));
    for entry in &section.entries {
        out.push_str(&format!(
            "      #block(below: 8pt)[\n        #text(size: 12pt, weight: \"bold\")[{}]#text(size: 12pt)[{}] \\\n",
            lit(&entry.title),
            lit(&entry.subtitle)
        ));
        if let Some(detail) = &entry.detail {
            out.push_str(&format!("        #text(fill: muted)[{}] \\\n", lit(detail)));
        }
        if let Some(body) = &entry.body {
            out.push_str(&format!("        #text(fill: muted)[{}]\n", lit(body)));
        }
        out.push_str("      ]\n");
    }
    out.push_str("    ]\n");
}

fn write_side_section(out: &mut String, section: &Section) {
    out.push_str(&format!(
        "    #block(below: 16pt)[\n      #text(fill: accent, weight: \"bold\")[{}] \\\n",
        section.heading
    ));
    for entry in &section.entries {
        out.push_str(&format!("      #text(fill: muted)[{}] \\\n", lit(&entry.title)));
    }
    out.push_str("    ]\n");
}

/// Embeds user text as a Typst string so no markup in it is interpreted.
fn lit(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 3);
    out.push_str("#\"");
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
