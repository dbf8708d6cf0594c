fn main() {
    if let Err(err) = pdf_mindmap::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
