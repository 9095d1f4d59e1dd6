use clap::{Parser, Subcommand};
use std::path::PathBuf;

const EXIT_INPUT: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Grade a student's sheet against the course policy
    Grade {
        /// Path to the grade sheet JSON (category -> section records)
        sheet: PathBuf,

        /// Fill every slot with random scores (policy demos only)
        #[arg(long)]
        random: bool,

        /// Emit tab-separated values instead of the report
        #[arg(long, conflicts_with = "json")]
        tsv: bool,

        /// Emit the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate the course policy and exit
    Check,
}

#[derive(Parser, Debug)]
#[command(name = "markbook")]
#[command(about = "Course grade calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the policy file (defaults to ~/.config/markbook/policy.yaml)
    #[arg(short, long, global = true)]
    policy: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    // Load and build the course policy; a bad policy fails here, before
    // any sheet is graded.
    let policy_path = cli.policy.map(PathBuf::from);
    let policy = match markbook::config::load_policy(policy_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Policy error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let grader = match markbook::grader_from_conf(markbook::GraderConf::Specs(policy.graders)) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Policy error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = markbook::validate_policy(&grader) {
        eprintln!("Policy errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if cli.verbose {
        eprintln!("Loaded {} graders from policy", grader.subgraders.len());
        for (subgrader, category, weight) in &grader.subgraders {
            eprintln!(
                "  {} (x{}, drop {}): weight {}",
                category, subgrader.min_count, subgrader.drop_count, weight
            );
        }
    }

    match cli.command {
        Commands::Check => {
            let total_weight: f64 = grader.subgraders.iter().map(|(_, _, w)| w).sum();
            println!(
                "Policy OK: {} graders, total weight {:.0}%",
                grader.subgraders.len(),
                total_weight * 100.0
            );
        }
        Commands::Grade {
            sheet,
            random,
            tsv,
            json,
        } => {
            let grade_sheet = match markbook::config::load_grade_sheet(&sheet) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Grade sheet error: {}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            let result = grader.grade(&grade_sheet, random);

            if json {
                match serde_json::to_string_pretty(&result) {
                    Ok(rendered) => println!("{}", rendered),
                    Err(e) => {
                        eprintln!("Failed to encode result: {}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                }
            } else if tsv {
                println!("{}", markbook::output::format_tsv(&result));
            } else {
                let use_colors = markbook::output::should_use_colors();
                println!("{}", markbook::output::format_report(&result, use_colors));
            }
        }
    }
}
