use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use graphfrag::{
    config::CompilerConfig, render, Direction, EdgeSpec, Endpoint, Fragment, FragmentCompiler,
    JsonRecord, Label, MatchClause, MatchOverride,
};
use std::path::PathBuf;

/// Graphfrag - compile JSON records into parameterized Cypher
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tag family that marks bindable fields
    #[arg(long)]
    tag_name: Option<String>,

    /// Variable for nodes and relationships
    #[arg(long)]
    variable: Option<String>,

    /// Variable for the start node of an edge
    #[arg(long)]
    start_variable: Option<String>,

    /// Variable for the end node of an edge
    #[arg(long)]
    end_variable: Option<String>,

    /// Prefix for every parameter name
    #[arg(long)]
    param_prefix: Option<String>,

    /// Default match clause entry, TEMPLATE=PARAM (repeatable)
    #[arg(long = "default-match", value_parser = parse_match_entry)]
    default_match: Vec<(String, String)>,

    /// Print the query with parameters inlined instead of JSON
    #[arg(long)]
    inline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct RecordArgs {
    /// JSON object, or @path to a file holding one
    #[arg(long)]
    record: String,

    /// Entity name of the record
    #[arg(long)]
    name: String,

    /// Label (defaults to the entity name)
    #[arg(long)]
    label: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// (v:Label {props})
    Node {
        #[command(flatten)]
        record: RecordArgs,
    },
    /// MATCH (v:Label) WHERE ...
    Match {
        #[command(flatten)]
        record: RecordArgs,
        /// Match clause entry, TEMPLATE=PARAM (repeatable)
        #[arg(long = "match", value_parser = parse_match_entry)]
        matches: Vec<(String, String)>,
        #[arg(long = "return")]
        with_return: bool,
    },
    /// CREATE (v:Label {props})
    Create {
        #[command(flatten)]
        record: RecordArgs,
        #[arg(long = "return")]
        with_return: bool,
        /// Tag value to leave out (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },
    /// MERGE (v:Label) WHERE ... SET ...
    Update {
        #[command(flatten)]
        record: RecordArgs,
        #[arg(long = "match", value_parser = parse_match_entry)]
        matches: Vec<(String, String)>,
        #[arg(long = "return")]
        with_return: bool,
        #[arg(long)]
        exclude: Vec<String>,
    },
    /// MATCH (v) WHERE ... [DETACH] DELETE v
    Delete {
        #[command(flatten)]
        record: RecordArgs,
        #[arg(long = "match", value_parser = parse_match_entry)]
        matches: Vec<(String, String)>,
        #[arg(long)]
        detach: bool,
    },
    /// Relationship between two matched nodes
    Edge(EdgeArgs),
}

#[derive(Args)]
struct EdgeArgs {
    #[arg(long)]
    start: String,
    #[arg(long)]
    start_name: String,
    #[arg(long)]
    start_label: Option<String>,
    #[arg(long, value_parser = parse_match_entry)]
    start_match: Vec<(String, String)>,

    #[arg(long)]
    end: String,
    #[arg(long)]
    end_name: String,
    #[arg(long)]
    end_label: Option<String>,
    #[arg(long, value_parser = parse_match_entry)]
    end_match: Vec<(String, String)>,

    /// Relationship record, JSON object or @path
    #[arg(long)]
    edge: String,
    #[arg(long)]
    edge_name: String,
    #[arg(long)]
    edge_label: Option<String>,

    /// in, out, or anything else for undirected
    #[arg(long)]
    direction: Option<String>,

    #[arg(long = "return")]
    with_return: bool,
    #[arg(long)]
    exclude: Vec<String>,

    /// MERGE ... SET instead of CREATE
    #[arg(long)]
    update: bool,
    /// Match clause for the relationship itself (with --update)
    #[arg(long, value_parser = parse_match_entry)]
    edge_match: Vec<(String, String)>,
}

fn parse_match_entry(raw: &str) -> Result<(String, String), String> {
    match raw.rsplit_once('=') {
        Some((template, param)) if !template.is_empty() && !param.is_empty() => {
            Ok((template.to_string(), param.to_string()))
        }
        _ => Err(format!("expected TEMPLATE=PARAM, got `{}`", raw)),
    }
}

fn match_override(entries: &[(String, String)]) -> MatchOverride {
    if entries.is_empty() {
        MatchOverride::Default
    } else {
        MatchOverride::Custom(entries.iter().cloned().collect())
    }
}

fn load_record(source: &str, name: &str) -> Result<JsonRecord> {
    let text = match source.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading record file {}", path))?,
        None => source.to_string(),
    };
    let value = serde_json::from_str(&text).with_context(|| format!("parsing record `{}`", name))?;
    Ok(JsonRecord::new(name, value))
}

fn build_config(cli: &Cli) -> Result<CompilerConfig> {
    let base = match &cli.config {
        Some(path) => CompilerConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CompilerConfig::default(),
    };

    let mut builder = base.into_builder().env_overrides();
    if let Some(tag_name) = &cli.tag_name {
        builder = builder.tag_name(tag_name);
    }
    if let Some(variable) = &cli.variable {
        builder = builder.variable(variable);
    }
    if let Some(start_variable) = &cli.start_variable {
        builder = builder.start_variable(start_variable);
    }
    if let Some(end_variable) = &cli.end_variable {
        builder = builder.end_variable(end_variable);
    }
    if let Some(param_prefix) = &cli.param_prefix {
        builder = builder.param_prefix(param_prefix);
    }
    if !cli.default_match.is_empty() {
        builder = builder.match_clause(cli.default_match.iter().cloned().collect::<MatchClause>());
    }

    Ok(builder.build()?)
}

fn run(compiler: &FragmentCompiler, command: &Command) -> Result<Fragment> {
    let fragment = match command {
        Command::Node { record } => {
            let entity = load_record(&record.record, &record.name)?;
            compiler.node_with_properties(&entity, &Label::from(record.label.clone()))?
        }
        Command::Match {
            record,
            matches,
            with_return,
        } => {
            let entity = load_record(&record.record, &record.name)?;
            let label = Label::from(record.label.clone());
            match match_override(matches) {
                MatchOverride::Default => compiler.match_node(&entity, &label, *with_return)?,
                MatchOverride::Custom(clause) => {
                    compiler.match_node_with(&entity, &label, &clause, *with_return)?
                }
            }
        }
        Command::Create {
            record,
            with_return,
            exclude,
        } => {
            let entity = load_record(&record.record, &record.name)?;
            let excludes: Vec<&str> = exclude.iter().map(String::as_str).collect();
            compiler.create_node(
                &entity,
                &Label::from(record.label.clone()),
                *with_return,
                &excludes,
            )?
        }
        Command::Update {
            record,
            matches,
            with_return,
            exclude,
        } => {
            let entity = load_record(&record.record, &record.name)?;
            let label = Label::from(record.label.clone());
            let excludes: Vec<&str> = exclude.iter().map(String::as_str).collect();
            match match_override(matches) {
                MatchOverride::Default => {
                    compiler.update_node(&entity, &label, *with_return, &excludes)?
                }
                MatchOverride::Custom(clause) => compiler.update_node_with_match(
                    &entity,
                    &label,
                    &clause,
                    *with_return,
                    &excludes,
                )?,
            }
        }
        Command::Delete {
            record,
            matches,
            detach,
        } => {
            let entity = load_record(&record.record, &record.name)?;
            match match_override(matches) {
                MatchOverride::Default => compiler.delete_node(&entity, *detach)?,
                MatchOverride::Custom(clause) => {
                    compiler.delete_node_with_match(&entity, *detach, &clause)?
                }
            }
        }
        Command::Edge(args) => run_edge(compiler, args)?,
    };

    Ok(fragment)
}

fn run_edge(compiler: &FragmentCompiler, args: &EdgeArgs) -> Result<Fragment> {
    let start = load_record(&args.start, &args.start_name)?;
    let end = load_record(&args.end, &args.end_name)?;
    let edge = load_record(&args.edge, &args.edge_name)?;

    let start_label = Label::from(args.start_label.clone());
    let end_label = Label::from(args.end_label.clone());
    let edge_label = Label::from(args.edge_label.clone());
    let start_match = match_override(&args.start_match);
    let end_match = match_override(&args.end_match);
    let excludes: Vec<&str> = args.exclude.iter().map(String::as_str).collect();

    let spec = EdgeSpec {
        label: &edge_label,
        direction: Direction::parse(args.direction.as_deref().unwrap_or_default()),
        return_all: args.with_return,
        excludes: &excludes,
        ..EdgeSpec::new(
            Endpoint::new(&start)
                .labelled(&start_label)
                .matched_by(&start_match),
            Endpoint::new(&end).labelled(&end_label).matched_by(&end_match),
            &edge,
        )
    };

    let fragment = match (args.update, match_override(&args.edge_match)) {
        (false, _) => compiler.create_edge_with_matches(&spec)?,
        (true, MatchOverride::Default) => {
            let default = compiler.config().match_clause.clone();
            compiler.update_edge_with_matches(&spec, &default)?
        }
        (true, MatchOverride::Custom(clause)) => {
            compiler.update_edge_with_matches(&spec, &clause)?
        }
    };
    Ok(fragment)
}

fn main() -> Result<()> {
    // Defaults to WARN, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    log::debug!("using configuration: {:?}", config);

    let compiler = FragmentCompiler::new(config)?;
    let fragment = run(&compiler, &cli.command)?;

    if cli.inline {
        println!("{}", render::inline_parameters(&fragment.query, &fragment.params)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&fragment)?);
    }
    Ok(())
}
