use std::process::ExitCode;

fn main() -> ExitCode {
    match labscan_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("labscan: {e}");
            ExitCode::FAILURE
        }
    }
}
