use serde::{Deserialize, Serialize};

/// Site-wide settings that influence option resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Command an allocation runs when none is given.
    #[serde(default)]
    pub default_command: Option<String>,
    /// Shell used when neither `default_command` nor `$SHELL` is set.
    #[serde(default = "default_shell")]
    pub default_shell: String,
    /// Scheduler parameters (e.g., "salloc_wait_nodes").
    #[serde(default)]
    pub sched_params: Vec<String>,
    /// Launch parameters (e.g., "mem_sort").
    #[serde(default)]
    pub launch_params: Vec<String>,
}

fn default_shell() -> String {
    "/bin/sh".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            default_command: None,
            default_shell: default_shell(),
            sched_params: Vec::new(),
            launch_params: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Whether scheduler parameter `name` is present.
    pub fn sched_param(&self, name: &str) -> bool {
        self.sched_params.iter().any(|p| p.trim().eq_ignore_ascii_case(name))
    }

    /// Step-launch memory binding defaults to sorted.
    pub fn mem_sort(&self) -> bool {
        self.launch_params.iter().any(|p| p.trim().eq_ignore_ascii_case("mem_sort"))
    }
}
