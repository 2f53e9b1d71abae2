//! CLI module for the tidynotes application
//!
//! This module handles the command-line interface for interacting with the
//! workspace: entity lifecycle commands, batch operations, view listing,
//! and import/export.

use std::{
    fs::{read_to_string, OpenOptions},
    io::{stdin, stdout, Write},
    path::Path,
    process::Command,
};

use log::{info, warn};
use shell_words::split;
use tempfile::Builder;
use uuid::Uuid;
use which::which;

use crate::{
    compute_view, notes_of, root_notes, Commands, EntityKind, FolderPatch, Note, NotePatch,
    Result, Tab, TidyError, ViewSlice, Workspace,
};

/// CLI Application handler - processes CLI commands and interfaces with the
/// workspace
pub struct App {
    /// The workspace owning all state
    workspace: Workspace,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    /// Create a new CLI application over the given workspace
    pub fn new(workspace: Workspace, verbose: bool) -> Self {
        Self { workspace, verbose }
    }

    /// Consumes the app, handing the workspace back for shutdown handling
    pub fn into_workspace(self) -> Workspace {
        self.workspace
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::New {
                folder,
                title,
                content,
                edit,
            } => self.handle_new(folder, title, content, edit)?,

            Commands::NewFolder { name } => self.handle_new_folder(name)?,

            Commands::Edit {
                id,
                title,
                content,
                edit,
            } => self.handle_edit(id, title, content, edit)?,

            Commands::Rename { id, name } => self.handle_rename(id, name)?,

            Commands::Move { ids, folder } => self.handle_move(ids, folder)?,

            Commands::Pin { ids } => self.handle_pin(ids)?,

            Commands::Delete { ids, force } => self.handle_delete(ids, force)?,

            Commands::Restore { ids } => self.handle_restore(ids)?,

            Commands::Purge { ids, force } => self.handle_purge(ids, force)?,

            Commands::List {
                tab,
                query,
                folder,
                json,
            } => self.handle_list(tab, query.unwrap_or_default(), folder, json)?,

            Commands::Search { query, tab, json } => self.handle_list(tab, query, None, json)?,

            Commands::Export { output } => self.handle_export(output)?,

            Commands::Import { input, force } => self.handle_import(&input, force)?,

            Commands::Config {
                show,
                dark_theme,
                suppress_delete_confirm,
            } => self.handle_config(show, dark_theme, suppress_delete_confirm)?,
        }

        Ok(())
    }

    fn handle_new(
        &mut self,
        folder: Option<Uuid>,
        title: Option<String>,
        content: Option<String>,
        open_editor: bool,
    ) -> Result<()> {
        if let Some(folder_id) = folder {
            if self.workspace.universe().folder(folder_id).is_none() {
                warn!("Folder {} does not exist; note will render at root", folder_id);
            }
        }

        let note = self.workspace.create_note(folder);
        let title = title.unwrap_or_default();

        let content = match (content, open_editor) {
            (Some(c), _) => c,
            (None, true) => self.open_editor_for_content(&title, "")?,
            (None, false) => String::new(),
        };

        self.workspace.update_note(
            note.id,
            NotePatch {
                title: Some(title),
                content: Some(content),
                ..Default::default()
            },
        );

        println!("Note created with ID: {}", note.id);
        Ok(())
    }

    fn handle_new_folder(&mut self, name: Option<String>) -> Result<()> {
        let folder = self.workspace.create_folder();
        if let Some(name) = name {
            self.workspace.update_folder(
                folder.id,
                FolderPatch {
                    name: Some(name),
                    ..Default::default()
                },
            );
        }

        let folder = self
            .workspace
            .universe()
            .folder(folder.id)
            .cloned()
            .ok_or_else(|| TidyError::ApplicationError {
                message: "Folder vanished immediately after creation".to_string(),
            })?;
        println!("Folder '{}' created with ID: {}", folder.name, folder.id);
        Ok(())
    }

    fn handle_edit(
        &mut self,
        id: Uuid,
        title: Option<String>,
        content: Option<String>,
        open_editor: bool,
    ) -> Result<()> {
        if content.is_some() && open_editor {
            return Err(TidyError::ApplicationError {
                message: "Cannot specify both --content and --edit options".to_string(),
            });
        }

        let Some(note) = self.workspace.universe().note(id).cloned() else {
            println!("No note with ID {} (nothing changed).", id);
            return Ok(());
        };

        if let Some(new_title) = title {
            self.workspace.update_note(
                id,
                NotePatch {
                    title: Some(new_title),
                    ..Default::default()
                },
            );
        }

        if let Some(new_content) = content {
            // Content edits go through the debounced path; the pending
            // write is flushed before the process exits.
            self.workspace.edit_note_content(id, new_content);
            println!("Content updated");
        } else if open_editor {
            let edited = self.open_editor_for_content(&note.title, &note.content)?;
            self.workspace.edit_note_content(id, edited);
            println!("Content updated from editor");
        }

        println!("Note {} updated successfully", id);
        Ok(())
    }

    fn handle_rename(&mut self, id: Uuid, name: String) -> Result<()> {
        if self.workspace.universe().folder(id).is_none() {
            println!("No folder with ID {} (nothing changed).", id);
            return Ok(());
        }

        self.workspace.update_folder(
            id,
            FolderPatch {
                name: Some(name.clone()),
                ..Default::default()
            },
        );
        println!("Folder {} renamed to '{}'", id, name);
        Ok(())
    }

    fn handle_move(&mut self, ids: Vec<Uuid>, folder: Option<Uuid>) -> Result<()> {
        if let Some(folder_id) = folder {
            if self.workspace.universe().folder(folder_id).is_none() {
                return Err(TidyError::ApplicationError {
                    message: format!("Target folder not found: {}", folder_id),
                });
            }
        }

        self.select(&ids);
        self.workspace.batch_move(folder);

        match folder {
            Some(folder_id) => println!("Moved selection into folder {}", folder_id),
            None => println!("Moved selection to root"),
        }
        Ok(())
    }

    fn handle_pin(&mut self, ids: Vec<Uuid>) -> Result<()> {
        self.select(&ids);
        self.workspace.batch_toggle_favorite();

        let universe = self.workspace.universe();
        for id in &ids {
            let state = match universe.kind_of(*id) {
                Some(EntityKind::Note) => universe.note(*id).map(|n| n.is_pinned),
                Some(EntityKind::Folder) => universe.folder(*id).map(|f| f.is_pinned),
                None => None,
            };
            match state {
                Some(true) => println!("{}: pinned", id),
                Some(false) => println!("{}: unpinned", id),
                None => println!("{}: not found, skipped", id),
            }
        }
        Ok(())
    }

    fn handle_delete(&mut self, ids: Vec<Uuid>, force: bool) -> Result<()> {
        let known: Vec<Uuid> = ids
            .iter()
            .copied()
            .filter(|&id| self.workspace.universe().kind_of(id).is_some())
            .collect();

        if known.is_empty() {
            println!("Nothing to delete.");
            return Ok(());
        }

        // Confirmation gate: suppressible by the persisted preference or
        // the --force flag.
        if !force && !self.workspace.suppress_delete_confirm() {
            println!("You are about to move {} item(s) to the trash:", known.len());
            self.print_targets(&known);
            if !self.confirm("Move these items to the trash? [y/N]: ")? {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        self.select(&known);
        self.workspace.batch_delete(false);
        println!("Moved {} item(s) to the trash.", known.len());
        Ok(())
    }

    fn handle_restore(&mut self, ids: Vec<Uuid>) -> Result<()> {
        let mut restored = 0;
        for id in ids {
            match self.workspace.universe().kind_of(id) {
                Some(kind) => {
                    self.workspace.restore(kind, id);
                    restored += 1;
                }
                None => println!("{}: not found, skipped", id),
            }
        }
        println!("Restored {} item(s) from the trash.", restored);
        Ok(())
    }

    fn handle_purge(&mut self, ids: Vec<Uuid>, force: bool) -> Result<()> {
        // Permanent deletion is reachable only for trashed records; live
        // ids are skipped, never purged by accident.
        let trashed: Vec<Uuid> = ids
            .iter()
            .copied()
            .filter(|&id| {
                let universe = self.workspace.universe();
                match universe.kind_of(id) {
                    Some(EntityKind::Note) => universe.note(id).is_some_and(|n| n.is_deleted),
                    Some(EntityKind::Folder) => universe.folder(id).is_some_and(|f| f.is_deleted),
                    None => false,
                }
            })
            .collect();

        for id in &ids {
            if !trashed.contains(id) {
                println!("{}: not in the trash, skipped", id);
            }
        }

        if trashed.is_empty() {
            println!("Nothing to purge.");
            return Ok(());
        }

        if !force && !self.workspace.suppress_delete_confirm() {
            println!(
                "You are about to permanently delete {} item(s):",
                trashed.len()
            );
            self.print_targets(&trashed);
            println!("\nThis action cannot be undone!");
            if !self.confirm("Permanently delete these items? [y/N]: ")? {
                println!("Purge cancelled.");
                return Ok(());
            }
        }

        self.select(&trashed);
        self.workspace.batch_delete(true);
        println!("Permanently deleted {} item(s).", trashed.len());
        Ok(())
    }

    fn handle_list(
        &self,
        tab: Tab,
        query: String,
        folder: Option<Uuid>,
        json: bool,
    ) -> Result<()> {
        let universe = self.workspace.universe();

        // A folder listing is the containment-split query, not a tab view.
        if let Some(folder_id) = folder {
            let notes = notes_of(universe, folder_id);
            if json {
                println!("{}", serde_json::to_string_pretty(&notes)?);
            } else {
                self.display_notes_text(&notes)?;
                println!("\nFound {} note(s) in folder {}", notes.len(), folder_id);
            }
            return Ok(());
        }

        let slice = compute_view(universe, tab, &query);
        info!(
            "View computed: {} notes, {} folders visible",
            slice.notes.len(),
            slice.folders.len()
        );

        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "notes": slice.notes,
                    "folders": slice.folders,
                }))?
            );
            return Ok(());
        }

        self.display_slice_text(&slice, tab)?;
        Ok(())
    }

    fn handle_export(&self, output: Option<std::path::PathBuf>) -> Result<()> {
        let json = self.workspace.export_json()?;
        match output {
            Some(path) => {
                std::fs::write(&path, json)?;
                println!("Exported workspace to {}", path.display());
            }
            None => println!("{}", json),
        }
        Ok(())
    }

    fn handle_import(&mut self, input: &Path, force: bool) -> Result<()> {
        let raw = read_to_string(input).map_err(|e| TidyError::ApplicationError {
            message: format!("Failed to read {}: {}", input.display(), e),
        })?;

        if !force {
            println!("Importing will replace ALL existing notes and folders.");
            if !self.confirm("Continue with the import? [y/N]: ")? {
                println!("Import cancelled.");
                return Ok(());
            }
        }

        self.workspace.import_json(&raw)?;
        let universe = self.workspace.universe();
        println!(
            "Imported {} note(s) and {} folder(s) from {}",
            universe.notes.len(),
            universe.folders.len(),
            input.display()
        );
        Ok(())
    }

    fn handle_config(
        &mut self,
        show: bool,
        dark_theme: Option<bool>,
        suppress_delete_confirm: Option<bool>,
    ) -> Result<()> {
        if let Some(on) = dark_theme {
            self.workspace.set_dark_theme(on);
            println!("dark_theme = {}", on);
        }
        if let Some(on) = suppress_delete_confirm {
            self.workspace.set_suppress_delete_confirm(on);
            println!("suppress_delete_confirm = {}", on);
        }

        if show || (dark_theme.is_none() && suppress_delete_confirm.is_none()) {
            println!("dark_theme = {}", self.workspace.dark_theme());
            println!(
                "suppress_delete_confirm = {}",
                self.workspace.suppress_delete_confirm()
            );
        }
        Ok(())
    }

    /// Builds the workspace selection from a list of CLI-provided ids,
    /// using the long-press contract for the first one.
    fn select(&mut self, ids: &[Uuid]) {
        let mut iter = ids.iter();
        if let Some(&first) = iter.next() {
            self.workspace.selection.begin_with(first);
        }
        for &id in iter {
            if !self.workspace.selection.contains(id) {
                self.workspace.selection.toggle(id);
            }
        }
    }

    /// Prints a one-line summary for each delete/purge target.
    fn print_targets(&self, ids: &[Uuid]) {
        let universe = self.workspace.universe();
        for &id in ids {
            match universe.kind_of(id) {
                Some(EntityKind::Note) => {
                    if let Some(note) = universe.note(id) {
                        let title = if note.title.is_empty() {
                            "(untitled)"
                        } else {
                            note.title.as_str()
                        };
                        println!("  note   {}  {}", id, title);
                    }
                }
                Some(EntityKind::Folder) => {
                    if let Some(folder) = universe.folder(id) {
                        println!("  folder {}  {}", id, folder.name);
                    }
                }
                None => {}
            }
        }
    }

    /// Ask for a yes/no confirmation on stdin.
    fn confirm(&self, prompt: &str) -> Result<bool> {
        print!("{}", prompt);
        stdout().flush().map_err(TidyError::Io)?;

        let mut input = String::new();
        stdin().read_line(&mut input).map_err(TidyError::Io)?;

        let input = input.trim().to_lowercase();
        Ok(input == "y" || input == "yes")
    }

    /// Display a computed view slice in text format
    fn display_slice_text(&self, slice: &ViewSlice, tab: Tab) -> Result<()> {
        let universe = self.workspace.universe();

        if slice.notes.is_empty() && slice.folders.is_empty() {
            println!("Nothing to show.");
            return Ok(());
        }

        if !slice.folders.is_empty() {
            println!("{}", console::style("Folders").bold().underlined());
            for folder in &slice.folders {
                let count = notes_of(universe, folder.id).len();
                let pin = if folder.is_pinned { "* " } else { "  " };
                println!(
                    "{}{}  {}  ({} note{})",
                    pin,
                    console::style(&folder.name).bold(),
                    console::style(folder.id).dim(),
                    count,
                    if count == 1 { "" } else { "s" }
                );
            }
            println!();
        }

        // The trash shows every deleted note flat; elsewhere only root
        // notes appear at the top level, folder contents via --folder.
        let top_level: Vec<&Note> = if tab == Tab::Trash {
            slice.notes.iter().collect()
        } else {
            root_notes(slice, universe)
        };

        if !top_level.is_empty() {
            println!("{}", console::style("Notes").bold().underlined());
            let owned: Vec<Note> = top_level.into_iter().cloned().collect();
            self.display_notes_text(&owned)?;
        }

        println!(
            "\n{} note(s), {} folder(s) visible",
            slice.notes.len(),
            slice.folders.len()
        );
        Ok(())
    }

    /// Display notes in text format
    fn display_notes_text(&self, notes: &[Note]) -> Result<()> {
        // Use terminal width for formatting if available
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, note) in notes.iter().enumerate() {
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }

            let title = if note.title.is_empty() {
                "(untitled)"
            } else {
                note.title.as_str()
            };
            let pin = if note.is_pinned { "* " } else { "  " };

            println!("{}{}", pin, console::style(title).bold());
            println!("  {}", console::style(note.id).dim());

            if self.verbose {
                println!("  updated: {} ms, created: {} ms", note.updated_at, note.created_at);
                if let Some(folder_id) = note.folder_id {
                    println!("  folder:  {}", folder_id);
                }
            }

            let preview = self.get_content_preview(&note.content, 100);
            if !preview.is_empty() {
                println!("  {}", preview);
            }
        }

        Ok(())
    }

    /// Generate a content preview for displaying brief notes
    fn get_content_preview(&self, content: &str, max_len: usize) -> String {
        let first_line = content
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");

        if first_line.chars().count() <= max_len {
            first_line.to_string()
        } else {
            let cut: String = first_line.chars().take(max_len).collect();
            format!("{}...", cut)
        }
    }

    fn open_editor_for_content(&self, title: &str, existing_content: &str) -> Result<String> {
        // Create a temporary file with .md extension
        let temp_file = Builder::new().suffix(".md").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        self.write_editor_template(&temp_path, title, existing_content)?;

        let editor_cmd = editor_command();
        info!("Opening editor to write note content. Save and exit when done...");
        self.launch_editor(&editor_cmd, &temp_path)?;

        let content = read_to_string(&temp_path)?;
        Ok(self.process_editor_content(content))
    }

    fn write_editor_template(&self, path: &Path, title: &str, existing: &str) -> Result<()> {
        let mut file = OpenOptions::new().write(true).open(path)?;

        writeln!(file, "<!-- {} -->", if title.is_empty() { "New note" } else { title })?;
        writeln!(
            file,
            "<!-- Write your note content below. Comment lines are ignored. -->"
        )?;
        if !existing.is_empty() {
            writeln!(file, "{}", existing)?;
        }

        Ok(())
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        let path_str = file_path.to_string_lossy();

        // Handle shell-like command parsing
        let args = split(editor_cmd).map_err(|e| TidyError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        if args.is_empty() {
            return Err(TidyError::EditorError {
                message: "Empty editor command".to_string(),
            });
        }

        let mut command = Command::new(&args[0]);
        if args.len() > 1 {
            command.args(&args[1..]);
        }
        command.arg(path_str.as_ref());

        let status = command.status()?;
        if !status.success() {
            return Err(TidyError::EditorError {
                message: "Editor exited with non-zero status".to_string(),
            });
        }

        Ok(())
    }

    fn process_editor_content(&self, content: String) -> String {
        // Remove HTML comment lines from content
        content
            .lines()
            .filter(|line| {
                !(line.trim_start().starts_with("<!--") && line.trim_end().ends_with("-->"))
            })
            .collect::<Vec<&str>>()
            .join("\n")
    }
}

/// Resolves the editor command: `$EDITOR`, then platform fallbacks.
fn editor_command() -> String {
    if let Ok(editor) = std::env::var("EDITOR") {
        return editor;
    }

    if cfg!(windows) {
        "notepad".to_string()
    } else if cfg!(target_os = "macos") {
        "open -t".to_string()
    } else {
        for editor in &["nano", "vim", "vi", "emacs"] {
            if which(editor).is_ok() {
                return editor.to_string();
            }
        }
        "nano".to_string()
    }
}
