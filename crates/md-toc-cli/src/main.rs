use std::process;

fn main() {
    match md_toc_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("md-toc error: {err:#}");
            process::exit(md_toc_cli::EXIT_IO);
        }
    }
}
