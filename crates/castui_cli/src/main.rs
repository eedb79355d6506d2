use std::path::Path;
use std::path::PathBuf;

use castui_cli::ErrorKind;
use castui_cli::GenerateOptions;
use castui_cli::Network;
use castui_cli::Renderer;
use clap::ArgAction;
use clap::Parser;
use owo_colors::OwoColorize;

#[derive(Parser, Debug)]
#[command(
	name = "castui",
	version,
	about = "Generate a UI scaffold from an Anchor or Codama program IDL"
)]
struct Cli {
	/// Path to the IDL JSON file.
	#[arg(short, long, required_unless_present = "list_templates")]
	idl: Option<PathBuf>,

	/// Output directory. Existing files at generated paths are overwritten.
	#[arg(short, long, default_value = "./anchor-ui")]
	out: PathBuf,

	/// Template set to render with.
	#[arg(long, default_value = "shadcn")]
	template: String,

	/// Cluster the generated UI connects to.
	#[arg(long, value_enum, default_value_t = Network::Devnet)]
	network: Network,

	/// Program id to embed. Defaults to the address declared in the IDL.
	#[arg(long)]
	program_id: Option<String>,

	/// Directory containing the template sets.
	///
	/// Defaults to `templates/` next to the executable, then
	/// `../share/castui/templates`, then `./templates`.
	#[arg(long, env = "CASTUI_TEMPLATES_DIR")]
	templates_dir: Option<PathBuf>,

	/// Skip installing dependencies in the generated project.
	#[arg(long, default_value_t = false)]
	no_install: bool,

	/// Package manager used for the install step.
	#[arg(long, default_value = "yarn")]
	package_manager: String,

	/// Print the available template sets and exit.
	#[arg(long, default_value_t = false)]
	list_templates: bool,

	/// Increase log verbosity (repeatable).
	#[arg(short, long, action = ArgAction::Count)]
	verbose: u8,
}

fn main() {
	let cli = Cli::parse();

	if let Err(err) = castui_cli::logging::init(cli.verbose) {
		eprintln!("Failed to initialize logging: {err}");
	}

	let templates_dir = cli
		.templates_dir
		.clone()
		.unwrap_or_else(default_templates_dir);

	if cli.list_templates {
		run_list_templates(&templates_dir);
		return;
	}

	let Some(idl) = cli.idl.clone() else {
		eprintln!("{} --idl is required", "Error:".red().bold());
		std::process::exit(1);
	};

	run_generate(&cli, idl, templates_dir);
}

fn run_list_templates(templates_dir: &Path) {
	let templates = Renderer::new(templates_dir).available_templates();
	if templates.is_empty() {
		eprintln!("No templates found in {}", templates_dir.display());
		std::process::exit(1);
	}

	for template in templates {
		println!("{template}");
	}
}

fn run_generate(cli: &Cli, idl: PathBuf, templates_dir: PathBuf) {
	let options = GenerateOptions {
		idl_path: idl,
		out_dir: cli.out.clone(),
		template: cli.template.clone(),
		network: cli.network,
		program_id: cli.program_id.clone(),
		templates_dir,
	};

	println!("{}", "CastUI - IDL to UI generator".cyan().bold());
	println!("  IDL file:  {}", options.idl_path.display().green());
	println!("  Output:    {}", options.out_dir.display().green());
	println!("  Template:  {}", options.template.green());
	println!("  Network:   {}", options.network.green());

	let outcome = match castui_cli::generate(&options) {
		Ok(outcome) => outcome,
		Err(err) => {
			eprintln!("{} {err}", "Error generating UI:".red().bold());
			if err.kind() == ErrorKind::TemplateNotFound {
				eprintln!("Run `castui --list-templates` to see the available template sets.");
			}
			std::process::exit(1);
		}
	};

	println!(
		"{} {} instruction page(s) for `{}`",
		"Generated".green().bold(),
		outcome.summary.instruction_pages.len(),
		outcome.program_name,
	);

	if !cli.no_install {
		if let Err(err) = castui_cli::install_dependencies(&options.out_dir, &cli.package_manager) {
			eprintln!("{} {err}", "Dependency install failed:".red().bold());
			eprintln!(
				"Generated files were kept. See {} for details.",
				castui_cli::install::install_log_path(&options.out_dir).display()
			);
			std::process::exit(2);
		}
	}

	print_next_steps(&options.out_dir, &cli.package_manager, cli.no_install);
}

fn print_next_steps(out_dir: &Path, package_manager: &str, install_skipped: bool) {
	println!();
	println!("Next steps:");
	println!("  {}", format!("cd {}", out_dir.display()).cyan());
	if install_skipped {
		println!("  {}", format!("{package_manager} install").cyan());
	}
	println!("  {}", format!("{package_manager} run dev").cyan());
}

fn default_templates_dir() -> PathBuf {
	let exe_dir = std::env::current_exe()
		.ok()
		.and_then(|exe| exe.parent().map(Path::to_path_buf));

	if let Some(exe_dir) = exe_dir {
		let candidates = [
			exe_dir.join("templates"),
			exe_dir.join("../share/castui/templates"),
		];
		if let Some(found) = candidates.into_iter().find(|candidate| candidate.is_dir()) {
			return found;
		}
	}

	PathBuf::from("templates")
}
