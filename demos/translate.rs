use std::{env::args_os, io, path::Path};

use condor_xcsoar::{
    config::TranslatorConfig, coords::LocalConverter, diagnostics::Report,
    translator::translate_files,
};
use tracing::info;

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let config_path = args_os().nth(1).expect("missing argument: path to config.json");
    let task_path = args_os().nth(2).expect("missing argument: path to .fpl");
    let output_dir = args_os().nth(3).expect("missing argument: output directory");
    let profile_path = args_os().nth(4);

    let config = TranslatorConfig::from_path(Path::new(&config_path)).unwrap();
    let conv = LocalConverter::new(config.landscape_origin);
    let mut report = Report::default();
    match translate_files(
        &config,
        Path::new(&task_path),
        profile_path.as_deref().map(Path::new),
        &conv,
        &mut report,
    ) {
        Ok(translation) => {
            translation.write(Path::new(&output_dir)).unwrap();
            info!(
                "{} warnings, {} errors",
                report.warnings().count(),
                report.errors().count()
            );
            println!("{}", serde_json::to_string(&translation.task).unwrap());
        }
        Err(e) => eprintln!("{e}"),
    }
}
