//! Demand actions: one bulk command, or one command per selected row.

use planboard_core::{Command, SolveCommand};

/// Choose between a bulk command and per-row commands.
///
/// When the selection covers every loaded demand row, the bulk form
/// goes out as a single frame. Otherwise each selected demand gets its
/// own frame, in selection order. An empty selection sends nothing.
pub fn demand_action_commands(
    selected: &[String],
    loaded_rows: usize,
    when_all: Command,
    when_subset: impl Fn(&str) -> Command,
) -> Vec<Command> {
    if selected.is_empty() {
        return Vec::new();
    }
    if selected.len() == loaded_rows {
        return vec![when_all];
    }
    selected.iter().map(|name| when_subset(name)).collect()
}

/// Erase the plan of the selected demands.
pub fn unplan_demands(selected: &[String], loaded_rows: usize) -> Vec<Command> {
    demand_action_commands(
        selected,
        loaded_rows,
        Command::Solve(SolveCommand::Erase),
        |name| Command::Solve(SolveCommand::Unplan(name.to_string())),
    )
}

/// Plan the selected demands as early as possible.
pub fn plan_demands_forward(selected: &[String], loaded_rows: usize) -> Vec<Command> {
    demand_action_commands(
        selected,
        loaded_rows,
        Command::Solve(SolveCommand::ReplanForward),
        |name| Command::Solve(SolveCommand::DemandForward(name.to_string())),
    )
}

/// Plan the selected demands backward from their due dates.
pub fn plan_demands_backward(selected: &[String], loaded_rows: usize) -> Vec<Command> {
    demand_action_commands(
        selected,
        loaded_rows,
        Command::Solve(SolveCommand::ReplanBackward),
        |name| Command::Solve(SolveCommand::DemandBackward(name.to_string())),
    )
}
