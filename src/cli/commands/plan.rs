use anyhow::{Result, bail};

use super::super::{
    args::{PathArgs, PlanCommand},
    console,
    exit_status::ExitStatus,
};
use crate::{
    core::{discovery, path_template},
    utils::lang_tag,
};

/// Show where each input would be written. Never calls the model or git.
pub fn plan(cmd: PlanCommand) -> Result<ExitStatus> {
    let PathArgs {
        input_files,
        output_files,
        target_lang,
        workdir,
        ..
    } = &cmd.paths;

    let output_pattern = output_files.trim();
    if output_pattern.is_empty() {
        bail!("OUTPUT_FILES environment variable is required");
    }
    if !workdir.is_dir() {
        bail!("Working directory does not exist: {}", workdir.display());
    }

    let spec = Some(input_files.trim()).filter(|spec| !spec.is_empty());
    let found = discovery::discover(workdir, spec);

    let tag = lang_tag(target_lang);
    let rows: Vec<(String, String)> = found
        .files
        .iter()
        .map(|source| {
            let output = path_template::resolve(source, output_pattern, &tag);
            (source.clone(), output)
        })
        .collect();

    console::print_plan(&rows, &found.missing, target_lang.trim());
    Ok(ExitStatus::Success)
}
