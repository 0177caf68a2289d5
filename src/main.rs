use clap::{Parser, Subcommand};
use gallery_site::config::{self, RuntimeEnv};
use gallery_site::{generate, output, scan, server};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gallery-site")]
#[command(about = "Photo gallery server and static site generator")]
#[command(long_about = "\
Photo gallery server and static site generator

Photos are plain files in per-variant folders. The same folders feed the
live server and the static export.

Project structure:

  ./
  ├── config.toml                  # Optional, overrides stock defaults
  ├── static/
  │   ├── default.css              # Stylesheet
  │   ├── js/script.js             # Client script
  │   └── photos/
  │       ├── desktop/             # Landing page slideshow
  │       ├── mobile/              # Phone card gallery
  │       └── portfolio/           # Optional, /portfolio grid
  └── site_src/
      ├── index.html               # Static landing page template
      └── view/index.html          # Static single-photo viewer

Environment:
  GALLERY_ENV=development   enables /debug and fallback logging
  WEB3FORMS_KEY=...         contact form public key
  RUST_LOG=debug            log verbosity

Run 'gallery-site gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Project root holding config.toml, static/ and site_src/
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Listen address, overrides server.address
        #[arg(long)]
        address: Option<String>,
    },
    /// Export the site as static files
    Build {
        /// Output directory relative to --root, overrides paths.output_dir
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List the photos each variant would show
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { address } => {
            let site_config = config::load_config(&cli.root)?;
            let paths = site_config.resolve_paths(&cli.root);
            let address = address.unwrap_or(site_config.server.address);
            let state = server::AppState::new(paths, RuntimeEnv::from_process());
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(server::serve(state, &address))?;
        }
        Command::Build { output } => {
            let mut site_config = config::load_config(&cli.root)?;
            if let Some(dir) = output {
                site_config.paths.output_dir = dir;
                site_config.validate()?;
            }
            let paths = site_config.resolve_paths(&cli.root);
            let env = RuntimeEnv::from_process();
            if env.contact_key.is_none() {
                log::warn!(
                    "{} is not set, the contact form will use a placeholder key",
                    config::CONTACT_KEY_VAR
                );
            }
            println!("==> Building {}", paths.output_dir.display());
            let report = generate::build(&paths, env.contact_key.as_deref())?;
            output::print_build_output(&report);
        }
        Command::Check => {
            let paths = config::load_config(&cli.root)?.resolve_paths(&cli.root);
            let photos_dir = paths.photos_dir();
            println!("==> Checking {}", photos_dir.display());
            let listings = scan::list_all(&photos_dir)?;
            output::print_check_output(&listings);
            println!("==> Photo folders are readable");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
