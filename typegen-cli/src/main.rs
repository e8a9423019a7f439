use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use typegen_core::analysis::{difficulty_stats, verify_integrity};
use typegen_core::config::GeneratorConfig;
use typegen_core::model::generation_request::GenerationRequest;
use typegen_core::{Corpus, CorpusStore, Difficulty, PhraseGenerator, TypegenError};

/// Generate typing practice phrases from a difficulty-tiered corpus.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Corpus file (`.json`, anything else is binary)
	#[arg(global = true, short, long, default_value = "corpora/corpora.bin")]
	corpus: PathBuf,

	/// Optional JSON generator config
	#[arg(global = true, long)]
	config: Option<PathBuf>,

	/// Seed for reproducible output
	#[arg(global = true, long)]
	seed: Option<u64>,

	#[arg(global = true, short, long, default_value_t = false)]
	verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Generate phrases (difficulty preset unless --order/--phrases given)
	Generate(GenerateArgs),
	/// Word complexity statistics for every section
	Stats,
	/// Token counts of one section and its model
	ModelStats(GenerateArgs),
	/// Check section overlaps and generation isolation
	Verify,
	/// Inspect or edit the corpus
	#[command(subcommand)]
	Corpus(CorpusCommand),
}

#[derive(Args, Debug)]
struct GenerateArgs {
	#[arg(short, long, default_value = "medium")]
	difficulty: Difficulty,

	/// N-gram order (2-5)
	#[arg(short = 'n', long)]
	order: Option<usize>,

	/// Number of phrases (3-15)
	#[arg(short, long)]
	phrases: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum CorpusCommand {
	/// Show size and a sample of every section
	Info,
	/// Build the corpus from text files
	Create {
		#[arg(long)]
		easy: Vec<PathBuf>,
		#[arg(long)]
		medium: Vec<PathBuf>,
		#[arg(long)]
		hard: Vec<PathBuf>,
	},
	/// Replace a section's text
	Update { difficulty: Difficulty, text: String },
	/// Append text to a section
	Append { difficulty: Difficulty, text: String },
}

impl GenerateArgs {
	fn request(&self) -> Result<GenerationRequest, TypegenError> {
		let mut request = GenerationRequest::preset(self.difficulty);
		if let Some(n) = self.order {
			request.set_order(n)?;
		}
		if let Some(phrases) = self.phrases {
			request.set_num_phrases(phrases)?;
		}
		Ok(request)
	}
}

fn init_tracing(verbose: bool) {
	let default = if verbose { "debug" } else { "info" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
	tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if let Err(e) = run(&cli) {
		error!("{}", e);
		if let TypegenError::CorpusNotFound(_) = e {
			eprintln!("Create one with `typegen corpus create --easy <file> --medium <file> --hard <file>`.");
		}
		process::exit(1);
	}
}

fn run(cli: &Cli) -> Result<(), TypegenError> {
	let config = match &cli.config {
		Some(path) => GeneratorConfig::load_from_file(path)?,
		None => GeneratorConfig::default(),
	};
	let store = CorpusStore::new(&cli.corpus);
	let mut generator = match cli.seed {
		Some(seed) => PhraseGenerator::seeded(config, seed),
		None => PhraseGenerator::new(config),
	};

	match &cli.command {
		Commands::Generate(args) => {
			let request = args.request()?;
			let corpus = store.load()?;
			print_phrases(&corpus, &request, &mut generator);
		}
		Commands::Stats => {
			let corpus = store.load()?;
			let sample_size = generator.config().sample_size;
			for difficulty in Difficulty::ALL {
				let stats = difficulty_stats(&corpus, difficulty, sample_size);
				println!("\n{} section", difficulty);
				for class in Difficulty::ALL {
					let words = stats.get(class);
					println!("  {:<7}-like: {:>5} | Sample: {}", class, words.count, words.sample_words.join(", "));
				}
			}
		}
		Commands::ModelStats(args) => {
			let request = args.request()?;
			let corpus = store.load()?;
			let stats = generator.model_stats(&corpus, request.order(), request.difficulty());
			println!("Total tokens in corpus: {}", stats.total_tokens);
			println!("Unique words: {}", stats.unique_words);
			println!("Vocabulary size: {}", stats.vocabulary_size);
		}
		Commands::Verify => {
			let corpus = store.load()?;
			let report = verify_integrity(&corpus, &mut generator);

			println!("Corpus sizes (unique, normalized):");
			for (difficulty, size) in &report.vocabulary_sizes {
				println!("  {:<7} {}", difficulty, size);
			}
			println!("\nOverlaps:");
			for overlap in &report.overlaps {
				let sample: Vec<&str> = overlap.shared.iter().take(5).map(String::as_str).collect();
				if sample.is_empty() {
					println!("  {} / {}: 0", overlap.first, overlap.second);
				} else {
					println!("  {} / {}: {} (e.g., {})", overlap.first, overlap.second, overlap.shared.len(), sample.join(", "));
				}
			}
			println!("\nGeneration stays within section:");
			for (difficulty, check) in &report.generation {
				if check.phrases == 0 {
					println!("  {:<7} no phrases generated", difficulty);
				} else if check.is_clean() {
					println!("  {:<7} all words within section", difficulty);
				} else {
					let sample: Vec<&str> = check.outside.iter().take(8).map(String::as_str).collect();
					println!("  {:<7} {} word(s) outside section (e.g., {})", difficulty, check.outside.len(), sample.join(", "));
				}
			}
		}
		Commands::Corpus(command) => run_corpus(&store, command)?,
	}

	Ok(())
}

fn print_phrases(corpus: &Corpus, request: &GenerationRequest, generator: &mut PhraseGenerator) {
	println!(
		"Generating {} phrases (n={}, {} phrases)",
		request.difficulty(),
		request.order(),
		request.num_phrases()
	);

	let phrases = generator.generate(corpus, request);
	if phrases.is_empty() {
		println!("Could not generate valid phrases.");
		println!("The corpus might be too small for the selected n-gram order.");
		return;
	}

	for (i, phrase) in phrases.iter().enumerate() {
		println!("{}. {}", i + 1, phrase);
	}

	let stats = generator.model_stats(corpus, request.order(), request.difficulty());
	println!("\nTotal tokens in corpus: {}", stats.total_tokens);
	println!("Unique words: {}", stats.unique_words);
	println!("Vocabulary size: {}", stats.vocabulary_size);
}

fn run_corpus(store: &CorpusStore, command: &CorpusCommand) -> Result<(), TypegenError> {
	match command {
		CorpusCommand::Info => {
			let info = store.corpus_info()?;
			println!("File: {}", info.path.display());
			println!("Total size: {} characters", info.total_size);
			for (difficulty, section) in &info.sections {
				println!("\n{}:", difficulty);
				println!("  Words: {}", section.word_count);
				println!("  Characters: {}", section.char_count);
				println!("  Sample: {}", section.sample);
			}
		}
		CorpusCommand::Create { easy, medium, hard } => {
			let assignments: BTreeMap<Difficulty, Vec<PathBuf>> = [
				(Difficulty::Easy, easy),
				(Difficulty::Medium, medium),
				(Difficulty::Hard, hard),
			]
			.into_iter()
			.filter(|(_, files)| !files.is_empty())
			.map(|(difficulty, files)| (difficulty, files.clone()))
			.collect();

			if assignments.is_empty() {
				return Err(TypegenError::InvalidParameter("No input files given".to_owned()));
			}
			if !store.create_from_files(&assignments) {
				return Err(TypegenError::InvalidParameter(format!(
					"Failed to create corpus at {}",
					store.path().display()
				)));
			}
			println!("Corpus created at {}", store.path().display());
		}
		CorpusCommand::Update { difficulty, text } => {
			store.update_section(*difficulty, text)?;
			println!("{} section updated", difficulty);
		}
		CorpusCommand::Append { difficulty, text } => {
			store.append_section(*difficulty, text)?;
			println!("Text added to {} section", difficulty);
		}
	}
	Ok(())
}
