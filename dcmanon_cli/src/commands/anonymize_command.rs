use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::Args;
use rayon::prelude::*;

use dcmanon_anonymize::{
  AnonymizeConfig, AnonymizeError, Anonymizer, SharedUidCache, UidCache,
  UidResolver,
};
use dcmanon_core::{DcmanonError, RecordCodec, RecordIoError};
use dcmanon_json::{DicomJsonCodec, DicomJsonConfig};

use crate::{args::action_table_args::ActionTableArgs, utils};

pub const ABOUT: &str = "Anonymizes DICOM JSON files using the DICOM \
  confidentiality profile actions";

#[derive(Args)]
pub struct AnonymizeArgs {
  #[arg(
    required = true,
    help = "The DICOM JSON files to anonymize. Directories are searched \
      recursively for files with the extension given by --extension."
  )]
  input_paths: Vec<PathBuf>,

  #[arg(
    long,
    help = "The file extension of files to anonymize when searching \
      directories. Files given directly on the command line are always \
      anonymized.",
    default_value = "json"
  )]
  extension: String,

  #[arg(
    long,
    short,
    help = "The name of the output file.\n\
      \n\
      This argument is only permitted when a single input file is specified."
  )]
  output_filename: Option<PathBuf>,

  #[arg(
    long,
    short = 'd',
    help = "The directory to write output files into. Files found by searching \
      an input directory keep their path relative to that directory."
  )]
  output_directory: Option<PathBuf>,

  #[arg(
    long,
    help = "Whether to anonymize the input files in place, i.e. overwrite them \
      with the anonymized version rather than write it to a new file.\n\
      \n\
      If there is an error during anonymization of a file then it will not be \
      altered.\n\
      \n\
      WARNING: anonymization in-place is an irreversible operation.",
    default_value_t = false
  )]
  in_place: bool,

  #[command(flatten)]
  action_table_args: ActionTableArgs,

  #[arg(
    long,
    help = "Whether to keep private data elements. By default all private data \
      elements are deleted, except for those given an action by the catalog \
      or the action overrides.",
    default_value_t = false
  )]
  keep_private_tags: bool,

  #[arg(
    long,
    help = "Whether to replace UIDs independently for each file. By default \
      the same original UID is given the same replacement in every file, \
      which preserves references between files such as a shared Study \
      Instance UID.",
    default_value_t = false
  )]
  independent_uids: bool,

  #[arg(
    long,
    help = "Whether to pretty print the output DICOM JSON.",
    default_value_t = false
  )]
  pretty_print: bool,

  #[arg(
    long,
    help = "The number of threads to use to perform work. Each thread operates \
      on one input file at a time, so using more threads may improve \
      performance when processing many input files.\n\
      \n\
      The default thread count is the number of logical CPUs available.",
    default_value_t = rayon::current_num_threads()
  )]
  threads: usize,

  #[arg(
    long,
    help = "Overwrite existing output files",
    default_value_t = false
  )]
  overwrite: bool,
}

/// An input file, along with its path relative to the input directory it was
/// found in.
///
struct InputFile {
  path: PathBuf,
  relative_path: PathBuf,
}

enum AnonymizeCommandError {
  RecordIoError(RecordIoError),
  AnonymizeError(AnonymizeError),
}

impl From<RecordIoError> for AnonymizeCommandError {
  fn from(e: RecordIoError) -> Self {
    Self::RecordIoError(e)
  }
}

impl From<AnonymizeError> for AnonymizeCommandError {
  fn from(e: AnonymizeError) -> Self {
    Self::AnonymizeError(e)
  }
}

pub fn run(args: &AnonymizeArgs) -> Result<(), ()> {
  validate_output_args(args)?;

  let input_files = collect_input_files(args)?;

  if args.output_filename.is_some() && input_files.len() != 1 {
    eprintln!(
      "Error: --output-filename is only permitted with a single input file"
    );
    return Err(());
  }

  let output_filenames = output_filenames(&input_files, args)?;

  let action_table = Arc::new(args.action_table_args.action_table()?);
  let config =
    AnonymizeConfig::default().delete_private_tags(!args.keep_private_tags);
  let anonymizer = Anonymizer::with_shared_table(action_table, config);

  let codec = DicomJsonCodec::new(
    DicomJsonConfig::default().pretty_print(args.pretty_print),
  );

  let uid_cache = SharedUidCache::new();
  let failures = AtomicUsize::new(0);

  utils::create_thread_pool(args.threads)?.install(|| {
    input_files.par_iter().zip(&output_filenames).for_each(
      |(input_file, output_filename)| {
        let result = if args.independent_uids {
          anonymize_file(
            input_file,
            output_filename,
            &anonymizer,
            &codec,
            &mut UidCache::new(),
            args,
          )
        } else {
          anonymize_file(
            input_file,
            output_filename,
            &anonymizer,
            &codec,
            &mut uid_cache.clone(),
            args,
          )
        };

        if let Err(e) = result {
          let task_description =
            format!("anonymizing \"{}\"", input_file.path.display());

          match e {
            AnonymizeCommandError::RecordIoError(e) => {
              e.print(&task_description)
            }
            AnonymizeCommandError::AnonymizeError(e) => {
              e.print(&task_description)
            }
          }

          failures.fetch_add(1, Ordering::Relaxed);
        }
      },
    )
  });

  let failures = failures.into_inner();

  tracing::info!(
    files = input_files.len(),
    failures,
    uids = uid_cache.len(),
    "Finished anonymizing"
  );

  if failures > 0 {
    eprintln!(
      "Error: {} of {} files could not be anonymized",
      failures,
      input_files.len()
    );
    return Err(());
  }

  Ok(())
}

fn validate_output_args(args: &AnonymizeArgs) -> Result<(), ()> {
  if (args.output_filename.is_some() as u8
    + args.output_directory.is_some() as u8
    + args.in_place as u8)
    != 1
  {
    eprintln!(
      "Error: Exactly one of --output-filename, --output-directory, or \
       --in-place must be specified"
    );
    return Err(());
  }

  if let Some(output_directory) = &args.output_directory {
    if !output_directory.is_dir() {
      eprintln!(
        "Error: '{}' is not a valid directory",
        output_directory.display()
      );
      return Err(());
    }
  }

  Ok(())
}

/// Expands the input paths into the list of files to anonymize. Directories
/// are searched recursively for files with the configured extension.
///
fn collect_input_files(args: &AnonymizeArgs) -> Result<Vec<InputFile>, ()> {
  let mut input_files = vec![];

  for input_path in &args.input_paths {
    if !input_path.is_dir() {
      let file_name = input_path.file_name().map(PathBuf::from).ok_or_else(
        || eprintln!("Error: '{}' is not a file", input_path.display()),
      )?;

      input_files.push(InputFile {
        path: input_path.clone(),
        relative_path: file_name,
      });

      continue;
    }

    for entry in walkdir::WalkDir::new(input_path).sort_by_file_name() {
      let entry = entry.map_err(|e| {
        eprintln!(
          "Error: Failed reading directory '{}', details: {}",
          input_path.display(),
          e
        );
      })?;

      if !entry.file_type().is_file() || !has_extension(entry.path(), args) {
        continue;
      }

      let relative_path = entry
        .path()
        .strip_prefix(input_path)
        .unwrap_or(entry.path())
        .to_path_buf();

      input_files.push(InputFile {
        path: entry.into_path(),
        relative_path,
      });
    }
  }

  tracing::debug!(files = input_files.len(), "Collected input files");

  Ok(input_files)
}

fn has_extension(path: &Path, args: &AnonymizeArgs) -> bool {
  path.extension().is_some_and(|extension| {
    extension
      .to_string_lossy()
      .eq_ignore_ascii_case(args.extension.trim_start_matches('.'))
  })
}

/// Returns the output filename for each input file. Two input files that
/// would be written to the same output file are an error.
///
fn output_filenames(
  input_files: &[InputFile],
  args: &AnonymizeArgs,
) -> Result<Vec<PathBuf>, ()> {
  let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
  let mut output_filenames = Vec::with_capacity(input_files.len());

  for input_file in input_files {
    let output_filename = output_filename(input_file, args);

    if let Some(other_input) =
      seen.insert(output_filename.clone(), &input_file.path)
    {
      eprintln!(
        "Error: Input files '{}' and '{}' would both be written to '{}'",
        other_input.display(),
        input_file.path.display(),
        output_filename.display()
      );
      return Err(());
    }

    output_filenames.push(output_filename);
  }

  Ok(output_filenames)
}

fn output_filename(input_file: &InputFile, args: &AnonymizeArgs) -> PathBuf {
  if let Some(output_filename) = &args.output_filename {
    output_filename.clone()
  } else if let Some(output_directory) = &args.output_directory {
    output_directory.join(&input_file.relative_path)
  } else {
    input_file.path.clone()
  }
}

fn anonymize_file(
  input_file: &InputFile,
  output_filename: &Path,
  anonymizer: &Anonymizer,
  codec: &DicomJsonCodec,
  uid_resolver: &mut dyn UidResolver,
  args: &AnonymizeArgs,
) -> Result<(), AnonymizeCommandError> {
  if args.in_place {
    println!("Anonymizing \"{}\" in place …", input_file.path.display());
  } else {
    println!(
      "Anonymizing \"{}\" => \"{}\" …",
      input_file.path.display(),
      output_filename.display()
    );

    if !args.overwrite && output_filename.exists() {
      return Err(AnonymizeCommandError::RecordIoError(RecordIoError::new(
        "Checking output file",
        format!(
          "Output file \"{}\" already exists. Specify --overwrite to \
           automatically overwrite existing files",
          output_filename.display()
        ),
      )));
    }
  }

  let mut record = codec.load(&input_file.path)?;

  anonymizer.anonymize(&mut record, uid_resolver)?;

  if let Some(parent) = output_filename.parent() {
    if !parent.as_os_str().is_empty() {
      std::fs::create_dir_all(parent).map_err(|e| {
        RecordIoError::new("Creating output directory", e.to_string())
      })?;
    }
  }

  let temp_filename = utils::temp_filename(output_filename);
  let mut renamer =
    utils::TempFileRenamer::new(temp_filename.clone(), output_filename.into());

  codec.save(&record, &temp_filename)?;

  renamer
    .commit()
    .map_err(|(when, details)| RecordIoError::new(&when, details).into())
}
