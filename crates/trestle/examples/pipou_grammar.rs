//! Renders the PipouScript token and rule diagrams into an HTML page.
//!
//! ```text
//! cargo run -p trestle --example pipou_grammar > grammar.html
//! ```
//!
//! The rules reference productions the page does not define (`expr`,
//! `statement`, ...); those boxes are drawn without links and listed on
//! stderr.

use std::fmt::Write;

use trestle::{
    Trestle,
    description::GrammarDescription,
    document::HtmlDocument,
    grammar::{Grammar, Production, ProductionKind},
    render::{RenderTarget, Targets},
};

const GRAMMAR: &str = include_str!("pipou_grammar.toml");

/// Where a production's diagram goes on the page.
fn target(production: &Production) -> RenderTarget {
    let name = production.name();
    match production.kind() {
        ProductionKind::Token => RenderTarget::anchored(name),
        ProductionKind::Rule if name == "object_field_init" => {
            RenderTarget::new(name, "obj_field_init")
        }
        ProductionKind::Rule => RenderTarget::new(name, name.to_string()),
    }
}

fn section<'a>(
    page: &mut String,
    title: &str,
    productions: impl Iterator<Item = &'a Production>,
    targets: &mut Targets,
) -> std::fmt::Result {
    writeln!(page, "<h1>{title}</h1>")?;
    for production in productions {
        let target = target(production);
        writeln!(
            page,
            r#"<h2>{}</h2><div id="{}"></div>"#,
            production.name(),
            target.location()
        )?;
        targets.push(target);
    }
    Ok(())
}

/// Builds the page template, one section per production kind.
fn page(grammar: &Grammar, targets: &mut Targets) -> Result<String, std::fmt::Error> {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head><title>PipouScript grammar</title></head>\n<body>\n",
    );
    section(&mut html, "Tokens", grammar.tokens(), targets)?;
    section(&mut html, "Grammar", grammar.rules(), targets)?;
    html.push_str("</body>\n</html>\n");
    Ok(html)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let grammar = GrammarDescription::from_toml_str(GRAMMAR)?.into_grammar()?;

    let mut targets = Targets::new();
    let template = page(&grammar, &mut targets)?;

    let mut document = HtmlDocument::new(template);
    let report = Trestle::default().run(&grammar, &targets, &mut document)?;

    for failure in report.failures() {
        eprintln!("{}: {}", failure.target().location(), failure.error());
    }
    for reference in report.unresolved() {
        eprintln!("{reference}");
    }

    println!("{}", document.render());
    Ok(())
}
