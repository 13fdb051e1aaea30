use clap::Args;
use owo_colors::{OwoColorize, Stream::Stdout};

use crate::args::action_table_args::ActionTableArgs;

pub const ABOUT: &str = "Prints the action table that results from a tag \
  catalog and action overrides";

#[derive(Args)]
pub struct PrintActionsArgs {
  #[command(flatten)]
  action_table_args: ActionTableArgs,
}

pub fn run(args: &PrintActionsArgs) -> Result<(), ()> {
  let action_table = args.action_table_args.action_table()?;

  for (pattern, action) in action_table.iter() {
    println!(
      "{} {}",
      pattern.if_supports_color(Stdout, |text| text.blue()),
      action
    );
  }

  Ok(())
}
