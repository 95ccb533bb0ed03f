use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return;
    };
    let completions_dir = out_dir.join("completions");

    if let Err(e) = fs::create_dir_all(&completions_dir) {
        println!("cargo:warning=Could not create {}: {}", completions_dir.display(), e);
        return;
    }

    let mut cmd = clap::Command::new("kaede")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scrape anime catalog pages into JSON")
        .arg(
            clap::arg!(<PAGE> "Page to scrape")
                .value_parser(["home", "complete", "ongoing", "anime-list", "search"]),
        )
        .arg(clap::arg!([INPUT] "URL to fetch, local HTML file, or '-' for stdin (default: live site)"))
        .arg(clap::arg!(-p --page <NUM> "Listing page number").default_value("1"))
        .arg(clap::arg!(-q --query <TEXT> "Search query (search only)"))
        .arg(
            clap::Arg::new("base_url")
                .long("base-url")
                .value_name("URL")
                .help("Root URL of the catalog site"),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--pretty "Pretty-print the JSON envelope"))
        .arg(clap::arg!(-v --verbose "Print progress to stderr"));

    for shell in [
        clap_complete::Shell::Bash,
        clap_complete::Shell::Zsh,
        clap_complete::Shell::Fish,
        clap_complete::Shell::PowerShell,
    ] {
        if let Err(e) = clap_complete::generate_to(shell, &mut cmd, "kaede", &completions_dir) {
            println!("cargo:warning=Could not generate {} completions: {}", shell, e);
        }
    }
}
