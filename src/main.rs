use std::process::ExitCode;

fn main() -> ExitCode {
    blobdl_lib::run()
}
