// Command-line interface for quill
//
// This binary converts documents between Markdown and HTML, extracts the prose of a Markdown
// document with the byte offsets it came from, and prints the internal trees for debugging.
// All of the work happens in the quill-babel library; this crate reads files, loads
// configuration and prints.
//
// Converting:
//
// The conversion needs a from and to pair. The from is auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  quill <input> --to <format> [--from <format>] [--output <file>]          - Convert between formats (default)
//  quill convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  quill extract <input>                      - Print text fragments with their spans
//  quill inspect <path> [<transform>]         - Print an internal representation (defaults to "treeviz")
//  quill code-blocks <input> [--lang <token>] - List fenced code blocks
//  quill --list-formats                       - List formats and inspect transforms
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix. Parameters naming a configuration setting
// (standalone, max-depth, ...) override the loaded configuration, the rest are passed to the
// format or transform.
// Example:
//  quill notes.md --to html --extra-standalone
//  quill inspect notes.md --extra-show-spans

mod transforms;

use clap::{Arg, ArgAction, Command, ValueHint};
use futures::executor::block_on;
use quill_babel::{
    extract_text, extract_text_with, fenced_code_blocks, Format, FormatError, FormatRegistry,
    Options, Transpiler,
};
use quill_config::{ExtractFormat, Loader, QuillConfig, PROJECT_FILE};
use std::collections::HashMap;
use std::fs;
use transforms::TransformContext;

const SUBCOMMANDS: &[&str] = &["convert", "extract", "inspect", "code-blocks", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key_opt {
            // A following non-flag argument is the value
            match args.get(i + 1).filter(|next| !next.starts_with('-')) {
                Some(value) => {
                    extra_params.insert(key.to_string(), value.clone());
                    i += 2;
                }
                None => {
                    extra_params.insert(key.to_string(), "true".to_string());
                    i += 1;
                }
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn input_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn from_arg() -> Arg {
    Arg::new("from")
        .long("from")
        .help("Source format (auto-detected from file extension if not specified)")
        .value_hint(ValueHint::Other)
}

fn build_cli() -> Command {
    Command::new("quill")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between Markdown and HTML and extract text with source offsets")
        .long_about(
            "quill converts documents between CommonMark Markdown and HTML5, and extracts the\n\
            prose of Markdown documents together with the byte offsets it came from.\n\n\
            Commands:\n  \
            - convert:     Transform between document formats (default)\n  \
            - extract:     Print text fragments with spans\n  \
            - inspect:     View internal representations (trees, fragments)\n  \
            - code-blocks: List fenced code blocks\n\n\
            Configuration:\n  \
            Defaults are layered with ./quill.toml and then --config <path>.\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override settings or pass format options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            quill notes.md --to html                  # Convert to HTML (outputs to stdout)\n  \
            quill page.html --to markdown -o page.md  # Convert to a Markdown file\n  \
            quill extract notes.md                    # Text fragments as JSON lines\n  \
            quill inspect notes.md                    # Markup tree visualization",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats and inspect transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a quill.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log pipeline stages to stderr (same as RUST_LOG=debug)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - markdown: CommonMark with frontmatter and math (.md)\n  \
                    - html:     HTML5 fragments or documents (.html)\n  \
                    - treeviz:  Markup tree visualization (output only)\n  \
                    - json:     Markup tree as JSON (output only)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    quill convert notes.md --to html -o notes.html  # Markdown to HTML file\n  \
                    quill convert page.html --to markdown           # HTML to Markdown (stdout)\n  \
                    quill notes.md --to html --extra-standalone     # Complete HTML document",
                )
                .arg(input_arg("input", "Input file path"))
                .arg(from_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("extract")
                .about("Print the text fragments of a document with their spans")
                .long_about(
                    "Print every prose text run of a document, in document order.\n\n\
                    Code blocks and math are skipped. Each fragment's span is a byte range\n\
                    into the input file, so source[start..end] is exactly the fragment.\n\n\
                    Output format comes from extract.format in the configuration:\n  \
                    - jsonl: {\"value\":\"…\",\"span\":{\"start\":0,\"end\":5}} per line\n  \
                    - plain: start..end<TAB>value per line\n\n\
                    Examples:\n  \
                    quill extract notes.md\n  \
                    quill extract notes.md --extra-extract-format plain",
                )
                .arg(input_arg("input", "Input file path"))
                .arg(from_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect internal representations of a document")
                .long_about(
                    "View the internal structure of a document.\n\n\
                    Transforms:\n  \
                    - treeviz:        Markup tree visualization (default)\n  \
                    - markup-json:    Markup tree as JSON\n  \
                    - hypertext-json: Hypertext tree as JSON\n  \
                    - fragments:      Extracted text fragments\n\n\
                    Extra Parameters:\n  \
                    --extra-show-spans    Append source spans to treeviz nodes\n  \
                    --extra-compact       Single-line markup-json\n\n\
                    Examples:\n  \
                    quill inspect notes.md                      # Tree visualization\n  \
                    quill inspect page.html hypertext-json      # HTML as parsed",
                )
                .arg(input_arg("path", "Path to the document"))
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to 'treeviz'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                )
                .arg(from_arg()),
        )
        .subcommand(
            Command::new("code-blocks")
                .about("List fenced code blocks as JSON lines")
                .long_about(
                    "List the fenced code blocks of a Markdown document with their info\n\
                    strings and spans, one JSON object per line.\n\n\
                    Examples:\n  \
                    quill code-blocks notes.md\n  \
                    quill code-blocks notes.md --lang rust",
                )
                .arg(input_arg("input", "Path to the Markdown file"))
                .arg(
                    Arg::new("lang")
                        .long("lang")
                        .help("Only list blocks whose language token matches")
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A leading argument that is neither a flag nor a subcommand is an input file
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_tracing(matches.get_flag("verbose"));

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let to = sub_matches.get_one::<String>("to").expect("to is required");
            let from = resolve_from(input, sub_matches.get_one::<String>("from"));
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, &from, to, output, &extra_params, &config);
        }
        Some(("extract", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let from = resolve_from(input, sub_matches.get_one::<String>("from"));
            handle_extract_command(input, &from, &config);
        }
        Some(("inspect", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or(transforms::DEFAULT_TRANSFORM);
            let from = resolve_from(path, sub_matches.get_one::<String>("from"));
            handle_inspect_command(path, &from, transform, &extra_params, &config);
        }
        Some(("code-blocks", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let lang = sub_matches.get_one::<String>("lang").map(|s| s.as_str());
            handle_code_blocks_command(input, lang, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// An explicit --from wins, otherwise the format is detected from the file extension.
fn resolve_from(input: &str, explicit: Option<&String>) -> String {
    if let Some(from) = explicit {
        return from.to_string();
    }
    match FormatRegistry::default().detect_format_from_filename(input) {
        Some(detected) => detected,
        None => {
            eprintln!("Error: Could not detect format from filename '{input}'");
            eprintln!("Please specify --from explicitly");
            std::process::exit(1);
        }
    }
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &QuillConfig,
) {
    let options = Options::from(config);
    let registry = FormatRegistry::with_options(&options);

    // Validate formats exist
    if let Err(e) = registry.get(from) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = read_source(input);
    tracing::debug!(input, from, to, bytes = source.len(), "converting");

    let mut result = match convert_with_transpiler(&source, from, to, extra_params, &options) {
        Some(converted) => converted,
        None => registry.parse(&source, from).and_then(|doc| {
            registry.serialize_with_options(&doc, to, extra_params)
        }),
    }
    .unwrap_or_else(|e| {
        eprintln!("Conversion error: {e}");
        std::process::exit(1);
    });

    if !result.ends_with('\n') {
        result.push('\n');
    }

    match output {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{result}"),
    }
}

/// Markdown ⇄ HTML without format parameters runs through the async pipeline.
fn convert_with_transpiler(
    source: &str,
    from: &str,
    to: &str,
    extra_params: &HashMap<String, String>,
    options: &Options,
) -> Option<Result<String, FormatError>> {
    if !extra_params.is_empty() {
        return None;
    }
    let transpiler = Transpiler::new(options.clone());
    match (from, to) {
        ("markdown", "html") => Some(block_on(transpiler.markup_to_hypertext(source))),
        ("html", "markdown") => Some(block_on(transpiler.hypertext_to_markup(source))),
        _ => None,
    }
}

/// Handle the extract command
fn handle_extract_command(input: &str, from: &str, config: &QuillConfig) {
    let source = read_source(input);

    let fragments = if from == "markdown" {
        extract_text_with(source.as_str(), &config.markup_options())
    } else {
        let registry = FormatRegistry::with_options(&Options::from(config));
        registry
            .parse(&source, from)
            .and_then(|doc| extract_text(&doc))
    }
    .unwrap_or_else(|e| {
        eprintln!("Extraction error: {e}");
        std::process::exit(1);
    });

    let output = transforms::render_fragments(&fragments, config.extract.format)
        .unwrap_or_else(|e| {
            eprintln!("Output error: {e}");
            std::process::exit(1);
        });
    print!("{output}");
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    from: &str,
    transform: &str,
    extra_params: &HashMap<String, String>,
    config: &QuillConfig,
) {
    let source = read_source(path);
    let options = Options::from(config);
    let ctx = TransformContext {
        from,
        options: &options,
        extract_format: config.extract.format,
        extra_params,
    };

    let output = transforms::execute_transform(&source, transform, &ctx).unwrap_or_else(|e| {
        eprintln!("Execution error: {e}");
        std::process::exit(1);
    });

    print!("{output}");
}

/// Handle the code-blocks command
fn handle_code_blocks_command(input: &str, lang: Option<&str>, config: &QuillConfig) {
    let source = read_source(input);
    let registry = FormatRegistry::with_options(&Options::from(config));
    let doc = registry.parse(&source, "markdown").unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });

    for block in fenced_code_blocks(&doc)
        .into_iter()
        .filter(|block| lang.is_none() || block.lang.as_deref() == lang)
    {
        match serde_json::to_string(&block) {
            Ok(line) => println!("{line}"),
            Err(e) => {
                eprintln!("Output error: {e}");
                std::process::exit(1);
            }
        }
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Conversion formats:");
    let registry = FormatRegistry::default();
    for format in registry.formats() {
        let direction = match (format.supports_parsing(), format.supports_serialization()) {
            (true, true) => "in/out",
            (true, false) => "in",
            (false, true) => "out",
            (false, false) => "-",
        };
        println!(
            "  {:<10} {:<7} .{:<16} {}",
            format.name(),
            direction,
            format.file_extensions().join(", ."),
            format.description()
        );
    }

    println!("\nInspect transforms:");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> QuillConfig {
    let loader = Loader::new().with_optional_file(PROJECT_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    let config = loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    });
    tracing::debug!(?config, "configuration loaded");
    config
}

/// Move extras that name a configuration setting into `config`.
fn apply_config_overrides(config: &mut QuillConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("math") {
        config.markup.math = parse_bool_arg("math", &raw);
    }
    if let Some(raw) = extra_params.remove("frontmatter") {
        config.markup.frontmatter = parse_bool_arg("frontmatter", &raw);
    }
    if let Some(raw) = extra_params.remove("normalize-frontmatter") {
        config.markup.normalize_frontmatter = parse_bool_arg("normalize-frontmatter", &raw);
    }
    if let Some(raw) = extra_params.remove("fragment") {
        config.hypertext.fragment = parse_bool_arg("fragment", &raw);
    }
    if let Some(raw) = extra_params.remove("standalone") {
        config.hypertext.standalone = parse_bool_arg("standalone", &raw);
    }
    if let Some(raw) = extra_params.remove("keep-frontmatter") {
        config.transform.keep_frontmatter = parse_bool_arg("keep-frontmatter", &raw);
    }
    if let Some(raw) = extra_params.remove("max-depth") {
        config.limits.max_depth = raw.parse().unwrap_or_else(|_| {
            eprintln!("Invalid depth '{raw}' for --extra-max-depth");
            std::process::exit(1);
        });
    }
    if let Some(raw) = take_override(extra_params, &["extract-format", "format"]) {
        config.extract.format = match raw.as_str() {
            "jsonl" => ExtractFormat::Jsonl,
            "plain" => ExtractFormat::Plain,
            other => {
                eprintln!("Invalid extract format '{other}' (expected jsonl or plain)");
                std::process::exit(1);
            }
        };
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
