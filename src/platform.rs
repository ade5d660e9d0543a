//! # Platform-specific utilities
//!
//! Questo modulo centralizza la logica cross-platform per i comandi esterni:
//! nomi degli eseguibili (es. `npx.cmd` su Windows) e verifica della loro
//! presenza nel `PATH` prima di avviare il batch.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Platform-specific command manager
pub struct PlatformCommands {
    commands: HashMap<&'static str, &'static str>,
    which_command: &'static str,
}

impl PlatformCommands {
    /// Get the singleton instance
    pub fn instance() -> &'static Self {
        static INSTANCE: OnceLock<PlatformCommands> = OnceLock::new();
        INSTANCE.get_or_init(Self::new)
    }

    fn new() -> Self {
        let mut commands = HashMap::new();
        let which_command = if cfg!(windows) {
            // npm ships batch shims on Windows
            commands.insert("npx", "npx.cmd");
            commands.insert("gltf-transform", "gltf-transform.cmd");
            "where"
        } else {
            commands.insert("npx", "npx");
            commands.insert("gltf-transform", "gltf-transform");
            "which"
        };

        Self {
            commands,
            which_command,
        }
    }

    /// Get the platform-specific command name
    pub fn get_command<'a>(&self, base_name: &'a str) -> &'a str {
        self.commands.get(base_name).copied().unwrap_or(base_name)
    }

    /// Get the command used to check if a program exists
    pub fn which_command(&self) -> &str {
        self.which_command
    }

    /// Check if a command is available on the system
    pub async fn is_command_available(&self, base_name: &str) -> bool {
        let command_name = self.get_command(base_name);

        // Explicit paths are checked directly
        if Path::new(command_name).components().count() > 1 {
            return Path::new(command_name).is_file();
        }

        if let Some(path) = Self::find_in_system_path(command_name) {
            debug!("Resolved {} -> {}", base_name, path.display());
            return true;
        }

        // Fallback to which/where
        let result = tokio::process::Command::new(self.which_command)
            .arg(command_name)
            .output()
            .await;

        match result {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }

    /// Find a tool in the system PATH
    fn find_in_system_path(command_name: &str) -> Option<PathBuf> {
        let paths = env::var_os("PATH")?;
        env::split_paths(&paths)
            .map(|dir| dir.join(command_name))
            .find(|path| path.is_file())
    }
}
