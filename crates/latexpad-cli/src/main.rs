use anyhow::{Context, Result, bail};
use latexpad_config::Config;
use latexpad_engine::editing::{Document, Position};
use latexpad_engine::worker::{
    WorkerEvent, WorkerRequest, WorkerResponse, forward_changes, spawn_latex_worker,
};
use latexpad_syntax::{Element, ParseTree, SyntaxError};
use std::{env, path::PathBuf, process};

const USAGE: &str = "Usage: latexpad-cli [--json] [file.tex]";

struct Args {
    file: Option<PathBuf>,
    json: bool,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args {
        file: None,
        json: false,
    };
    for arg in args {
        match arg.as_str() {
            "--json" => parsed.json = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with('-') => {
                return Err(format!("Unknown option '{flag}'\n{USAGE}"));
            }
            path if parsed.file.is_none() => parsed.file = Some(PathBuf::from(path)),
            _ => return Err(USAGE.to_string()),
        }
    }
    Ok(parsed)
}

/// Feeds `text` to a LaTeX worker the way an editor would and waits for the
/// first analysis.
async fn analyse(text: &str, config: &Config) -> Result<WorkerEvent> {
    let mut worker = spawn_latex_worker(config.update_timeout());
    worker.send(WorkerRequest::Init {
        timeout_ms: Some(config.update_timeout_ms),
    })?;

    let mut doc = Document::default();
    doc.set_new_line_mode(config.newline_mode);
    let forwarding = forward_changes(&mut doc, worker.requests.clone());
    doc.insert(Position::new(0, 0), text);
    doc.remove_listener(forwarding);

    let event = loop {
        match worker.responses.recv().await {
            Some(WorkerResponse::Event { event }) => break event,
            Some(WorkerResponse::Log { data }) => log::debug!("worker: {data}"),
            Some(other) => log::debug!("ignoring {other:?}"),
            None => bail!("latex worker stopped before reporting"),
        }
    };

    let mirror = worker.shutdown().await?;
    log::debug!("worker mirrored {} lines", mirror.document().len());
    Ok(event)
}

fn print_outline(tree: &ParseTree) {
    for element in &tree.elements {
        let location = format!("{}:{}", element.line(), element.column());
        match element {
            Element::Command(command) => {
                let star = if command.starred { "*" } else { "" };
                println!("{location:>8}  \\{}{star}{}", command.name, command.args);
            }
            Element::Text(text) => {
                let preview: String = text.content.trim().chars().take(60).collect();
                if !preview.is_empty() {
                    println!("{location:>8}  {}", preview.replace('\n', " "));
                }
            }
        }
    }
}

fn report_error(path: &std::path::Path, err: &SyntaxError) {
    eprintln!("{}:{}:{}: {err}", path.display(), err.line, err.column);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            process::exit(1);
        }
    };

    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(Some(config)) => {
            log::info!("Loaded config from {}", config_path.display());
            config
        }
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let Some(path) = args.file.or_else(|| config.default_file.clone()) else {
        eprintln!("Error: No file provided and no default_file configured");
        eprintln!("{USAGE}");
        eprintln!("Or set default_file in {}", config_path.display());
        process::exit(1);
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if text.is_empty() {
        log::info!("{} is empty, nothing to parse", path.display());
        return Ok(());
    }

    let event = analyse(&text, &config).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&event)?);
    }
    match event {
        WorkerEvent::Parsed { data } => {
            if !args.json {
                print_outline(&data);
            }
            log::info!("{}: {} elements", path.display(), data.elements.len());
            Ok(())
        }
        WorkerEvent::SyntaxError { data } => {
            report_error(&path, &data);
            process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parses_file_and_json_flag() {
        let parsed = parse_args(&args(&["--json", "paper.tex"])).unwrap();
        assert!(parsed.json);
        assert_eq!(parsed.file, Some(PathBuf::from("paper.tex")));
    }

    #[test]
    fn file_is_optional() {
        let parsed = parse_args(&[]).unwrap();
        assert!(!parsed.json);
        assert_eq!(parsed.file, None);
    }

    #[test]
    fn rejects_unknown_flags_and_extra_files() {
        assert!(parse_args(&args(&["--watch"])).is_err());
        assert!(parse_args(&args(&["a.tex", "b.tex"])).is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn analyse_parses_through_worker() {
        let config = Config {
            update_timeout_ms: 5,
            ..Config::default()
        };
        let event = analyse("\\section{Intro}\nText", &config).await.unwrap();
        let WorkerEvent::Parsed { data } = event else {
            panic!("expected a parse tree");
        };
        assert_eq!(data.commands().next().unwrap().name, "section");
    }
}
