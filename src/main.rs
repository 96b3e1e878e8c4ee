use clap::{Parser, Subcommand, ValueEnum};
use docshelf::{builder, config, git, output, plan, provision, redirect, releases};
use std::path::{Path, PathBuf};

/// Shared flags for commands that fetch the release list.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Ignore the cached release list and always query the release API
    #[arg(long)]
    no_cache: bool,
}

/// The `development` positional: present adds the checked-out branch to the
/// build, absent builds only the default branch and the release tags.
#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Development,
}

impl ModeArg {
    fn to_mode(mode: Option<Self>) -> plan::Mode {
        match mode {
            Some(ModeArg::Development) => plan::Mode::Development,
            None => plan::Mode::Standard,
        }
    }
}

#[derive(Parser)]
#[command(name = "docshelf")]
#[command(about = "Release-aware multi-version documentation site builder")]
#[command(long_about = "\
Release-aware multi-version documentation site builder

The release API is the data source. Recent release tags become versioned
documentation trees, the default branch (and, in development mode, the
checked-out branch) builds alongside them, and a generated index.html
redirects to the latest published version.

Pipeline:

  1. Fetch     release tags from the release API (cached on disk)
  2. Plan      branch + tag whitelists, resolve the latest version
  3. Build     wipe prior output, run the multi-version builder once
  4. Redirect  write the meta-refresh entry page

The latest version is the SECOND-newest tag: the newest tag is treated as
still in staging and is built but never redirected to.

Run 'docshelf gen-config' to generate a documented docshelf.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "docshelf.toml", global = true)]
    config: PathBuf,

    /// Project root: where the builder runs and output paths resolve
    #[arg(long, default_value = ".", global = true)]
    project_dir: PathBuf,

    /// Override the configured output directory
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and list the release tags under consideration
    Releases(CacheArgs),
    /// Compute and print the build whitelists
    Plan {
        /// Add the checked-out branch to the whitelist
        mode: Option<ModeArg>,
        #[command(flatten)]
        cache: CacheArgs,
    },
    /// Run the full pipeline: fetch → plan → build → redirect
    Build {
        /// Add the checked-out branch to the build
        mode: Option<ModeArg>,
        #[command(flatten)]
        cache: CacheArgs,
    },
    /// Validate the config and local environment without building
    Check,
    /// Write the test-harness instance definition
    Provision {
        /// Port the test harness listens on
        #[arg(long)]
        port: u16,
        /// Setup script executed on instance boot
        #[arg(long)]
        setup_script: PathBuf,
        /// Branch the instances check out (defaults to the current branch)
        #[arg(long)]
        branch: Option<String>,
    },
    /// Print a stock docshelf.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = config::load_config(&cli.config)?;
    if let Some(output_dir) = &cli.output {
        config.build.output_dir = output_dir.display().to_string();
    }

    match cli.command {
        Command::Releases(cache_args) => {
            let (tags, source) = releases::resolve_tags(
                &config.releases,
                &config.repo,
                &cache_dir(&cli.project_dir),
                !cache_args.no_cache,
            )?;
            let latest = releases::select_latest(&tags).ok();
            output::print_releases_output(&config.repo, &tags, latest, source);
        }
        Command::Plan { mode, cache } => {
            let (tags, _) = releases::resolve_tags(
                &config.releases,
                &config.repo,
                &cache_dir(&cli.project_dir),
                !cache.no_cache,
            )?;
            let build_plan =
                plan::compute_plan(&config, ModeArg::to_mode(mode), &cli.project_dir, tags)?;
            output::print_plan_output(&build_plan);
        }
        Command::Build { mode, cache } => {
            println!("==> Stage 1: Fetching releases for {}", config.repo);
            let (tags, source) = releases::resolve_tags(
                &config.releases,
                &config.repo,
                &cache_dir(&cli.project_dir),
                !cache.no_cache,
            )?;
            output::print_releases_output(
                &config.repo,
                &tags,
                releases::select_latest(&tags).ok(),
                source,
            );

            println!("==> Stage 2: Planning versions");
            let build_plan =
                plan::compute_plan(&config, ModeArg::to_mode(mode), &cli.project_dir, tags)?;
            output::print_plan_output(&build_plan);

            let output_dir = cli.project_dir.join(&config.build.output_dir);
            println!("==> Stage 3: Building → {}", output_dir.display());
            let versions = builder::build_site(&cli.project_dir, &config, &build_plan)?;

            println!("==> Stage 4: Writing redirect");
            redirect::write_redirect(&output_dir, &build_plan.latest)?;
            output::print_build_output(
                &output_dir,
                &versions,
                &redirect::redirect_target(&build_plan.latest),
            );

            println!("==> Build complete: {}", output_dir.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            println!("Repo: {}", config.repo);
            println!(
                "Releases: {} from {}",
                config.releases.count, config.releases.api_base
            );
            println!("Default branch: {}", config.branches.default);
            println!(
                "Builder: {} {}",
                config.builder.program,
                config.builder.args.join(" ")
            );
            match git::current_branch(&cli.project_dir) {
                Ok(branch) => println!("Checkout: {branch} (development mode available)"),
                Err(e) => println!("Checkout: {e} (development mode unavailable)"),
            }
            println!("==> Config is valid");
        }
        Command::Provision {
            port,
            setup_script,
            branch,
        } => {
            let branch = match branch {
                Some(branch) => branch,
                None => git::current_branch(&cli.project_dir)?,
            };
            let params = provision::InstanceParams {
                branch,
                port,
                setup_script: setup_script.display().to_string(),
            };
            let path = provision::write(&cli.project_dir, &config.provision, &params)?;
            output::print_provision_output(&path, &params);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Release-list cache location within the project.
fn cache_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(".docshelf")
}
