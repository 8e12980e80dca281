use anyhow::{Context, Result};
use relative_path::RelativePath;
use serde::Serialize;
use std::{env, path::PathBuf, process};
use vitrine_config::Config;
use vitrine_engine::{Page, Pipeline, SourceFile, io};

/// Page index written next to the rendered pages for the front-end shell.
#[derive(Debug, Serialize)]
struct Manifest {
    site_title: Option<String>,
    pages: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize)]
struct ManifestEntry {
    route: String,
    title: String,
    output: String,
}

fn main() -> Result<()> {
    env_logger::init();

    // Determine docs and output paths from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config;
    let from_config;

    match args.len() {
        3 => {
            config = Config::new(PathBuf::from(&args[1]), PathBuf::from(&args[2]));
            from_config = false;
        }
        2 => {
            config = Config::new(PathBuf::from(&args[1]), PathBuf::from("dist"));
            from_config = false;
        }
        1 => match Config::load() {
            Ok(Some(loaded)) => {
                config = loaded;
                from_config = true;
            }
            Ok(None) => {
                eprintln!("Error: No docs path provided and no config file found");
                eprintln!("Usage: {} <docs-folder-path> [output-path]", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("Usage: {} <docs-folder-path> [output-path]", args[0]);
                process::exit(1);
            }
        },
        _ => {
            eprintln!("Usage: {} [docs-folder-path] [output-path]", args[0]);
            process::exit(1);
        }
    }

    // Validate docs directory using the engine
    if let Err(e) = io::validate_docs_dir(&config.docs_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Docs path '{}'{} is invalid: {e}",
            config.docs_path.display(),
            source
        );
        process::exit(1);
    }

    let rendered = build_site(&config)?;
    println!(
        "Rendered {} page(s) to {}",
        rendered,
        config.output_path.display()
    );

    Ok(())
}

/// Renders every non-excluded markdown file under the docs root and writes
/// the page manifest. Returns the number of pages rendered.
fn build_site(config: &Config) -> Result<usize> {
    let pipeline = Pipeline::docs();
    let files = io::scan_markdown_files(&config.docs_path)
        .with_context(|| format!("failed to scan {}", config.docs_path.display()))?;

    let mut entries = Vec::new();

    for relative in files {
        if config.is_excluded(relative.as_str()) {
            log::debug!("skipping excluded file {relative}");
            continue;
        }

        let markdown = io::read_file(&relative, &config.docs_path)
            .with_context(|| format!("failed to read {relative}"))?;
        let page = Page::render(SourceFile::new(relative), &markdown, &pipeline);

        io::write_output(
            &page.source().output_path(),
            &config.output_path,
            page.html(),
        )
        .with_context(|| format!("failed to write {}", page.source().output_path()))?;
        log::info!(
            "rendered {} -> {}",
            page.source().relative_path(),
            page.source().output_path()
        );

        entries.push(ManifestEntry {
            route: page.source().route().to_string(),
            title: page.title().to_string(),
            output: page.source().output_path().as_str().to_string(),
        });
    }

    let manifest = Manifest {
        site_title: config.site_title.clone(),
        pages: entries,
    };
    let manifest_json = serde_json::to_string_pretty(&manifest)?;
    io::write_output(
        RelativePath::new("manifest.json"),
        &config.output_path,
        &manifest_json,
    )
    .context("failed to write manifest.json")?;

    Ok(manifest.pages.len())
}
