use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ibadah", about = concat!("ibadah v", env!("CARGO_PKG_VERSION"), " - thirty days, one checklist"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory and the first user
    Init(InitArgs),
    /// Manage local users
    User(UserCmd),
    /// Show the checklist for a day, or the 30-day grid
    Show(ShowArgs),
    /// Mark an item done on a day (or undo it)
    Toggle(ToggleArgs),
    /// Show completion statistics
    Stats,
    /// Edit categories
    Cat(CatCmd),
    /// Edit items and sub-items
    Item(ItemCmd),
    /// Restore the built-in checklist
    Reset(ResetArgs),
    /// Collapse or expand a category in the grid
    Collapse(CollapseArgs),
    /// Export the active user's data as JSON
    Export(ExportArgs),
    /// Replace the active user's data from an export file
    Import(ImportArgs),
    /// List the category colour palette
    Colors,
}

// ---------------------------------------------------------------------------
// Init / users
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Name of the first user
    pub name: String,
}

#[derive(Args)]
pub struct UserCmd {
    #[command(subcommand)]
    pub action: UserAction,
}

#[derive(Subcommand)]
pub enum UserAction {
    /// List users (the active one is starred)
    List,
    /// Create a user and switch to it
    Add(UserNameArg),
    /// Rename a user (default: the active one)
    Rename(UserRenameArgs),
    /// Delete a user and all of their data
    Rm(UserIdArg),
    /// Switch the active user
    Switch(UserIdArg),
}

#[derive(Args)]
pub struct UserNameArg {
    /// Display name
    pub name: String,
}

#[derive(Args)]
pub struct UserRenameArgs {
    /// New display name
    pub name: String,
    /// User to rename
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args)]
pub struct UserIdArg {
    /// User ID
    pub id: String,
}

// ---------------------------------------------------------------------------
// Tracking
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ShowArgs {
    /// Day (1-30) to show as a checklist
    #[arg(long)]
    pub day: Option<u32>,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Day (1-30)
    pub day: u32,
    /// Item ID
    pub item: String,
}

#[derive(Args)]
pub struct CollapseArgs {
    /// Category ID
    pub category: String,
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct CatCmd {
    #[command(subcommand)]
    pub action: CatAction,
}

#[derive(Subcommand)]
pub enum CatAction {
    /// Append a category
    Add(CatAddArgs),
    /// Rename a category
    Rename(RenameArgs),
    /// Change a category's colour
    Color(CatColorArgs),
    /// Delete a category and every item in it
    Rm(IdArg),
    /// Move a category up one place
    Up(IdArg),
    /// Move a category down one place
    Down(IdArg),
}

#[derive(Args)]
pub struct CatAddArgs {
    /// Category name
    pub name: Option<String>,
    /// Palette colour (see `ibadah colors`)
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Args)]
pub struct CatColorArgs {
    /// Category ID
    pub id: String,
    /// Palette colour (see `ibadah colors`)
    pub color: String,
}

#[derive(Args)]
pub struct ItemCmd {
    #[command(subcommand)]
    pub action: ItemAction,
}

#[derive(Subcommand)]
pub enum ItemAction {
    /// Append an item to a category
    Add(ItemAddArgs),
    /// Add a sub-item under an item
    Sub(ItemSubArgs),
    /// Rename an item
    Rename(RenameArgs),
    /// Delete an item and its sub-items
    Rm(IdArg),
    /// Move an item up among its siblings
    Up(IdArg),
    /// Move an item down among its siblings
    Down(IdArg),
}

#[derive(Args)]
pub struct ItemAddArgs {
    /// Category ID
    pub category: String,
    /// Item name
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ItemSubArgs {
    /// Parent item ID
    pub parent: String,
    /// Sub-item name
    pub name: Option<String>,
}

#[derive(Args)]
pub struct RenameArgs {
    /// ID
    pub id: String,
    /// New name
    pub name: String,
}

#[derive(Args)]
pub struct IdArg {
    /// ID
    pub id: String,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Confirm the reset
    #[arg(long)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ExportArgs {
    /// Write to this file instead of stdout (a directory gets a dated file name)
    #[arg(long)]
    pub out: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Export file to read
    pub file: String,
}
