pub mod anonymize_command;
pub mod print_actions_command;
