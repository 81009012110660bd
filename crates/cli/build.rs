use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("plainpage")
        .version(env!("CARGO_PKG_VERSION"))
        .author("plainpage contributors")
        .about("Extract clean article text from web pages")
        .arg(clap::arg!([INPUT] "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (text, markdown, json)")
                .value_name("FORMAT")
                .default_value("text")
                .value_parser(["text", "markdown", "json"]),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("10"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(--max_bytes <BYTES> "Maximum number of response bytes to read").default_value("5000000"))
        .arg(clap::arg!(-m --metadata_only "Only print the title and author"))
        .arg(clap::arg!(--metrics "Add word count and reading time (JSON only)"))
        .arg(clap::arg!(-v --verbose "Show progress and timings on stderr"))
        .arg(
            clap::arg!(--completions <SHELL> "Generate shell completion script")
                .value_name("SHELL")
                .value_parser(["bash", "zsh", "fish", "powershell"]),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "plainpage", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "plainpage", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "plainpage", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "plainpage", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
