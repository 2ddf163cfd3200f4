//! Configuration state mutated by option setters.

use serde::Serialize;

use crate::codec::{
    Bell, CpuFreq, Distribution, GresBinding, Hint, MailType, MemBind, NodeRange, PowerFlags,
    Priority, ProfileFlags, SharedMode, SocketCoreThread, UserEnv, WarnSignal,
};
use crate::options::Context;

/// Packed job flag bits sent downstream.
pub mod job_flags {
    pub const SPREAD_JOB: u32 = 0x1;
    pub const USE_MIN_NODES: u32 = 0x2;
    pub const GRES_DISABLE_BIND: u32 = 0x4;
    pub const GRES_ENFORCE_BIND: u32 = 0x8;
}

/// Specialized cores or threads reserved for system use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreSpec {
    #[default]
    Unset,
    Cores(u16),
    Threads(u16),
}

/// Options only the interactive allocation front-end has.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllocOptions {
    pub bell: Bell,
    /// Signal sent to the spawned command when the allocation ends.
    pub kill_command: Option<i32>,
    pub no_shell: bool,
    pub wait_all_nodes: Option<u16>,
    /// The job name came from the default command, not the user.
    pub default_job_name: bool,
}

/// Options only batch submission has.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOptions {
    pub wait_all_nodes: Option<u16>,
}

/// Options only step launch has.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepOptions {
    pub exclusive: bool,
    pub core_spec_set: bool,
    pub job_name_set_cmd: bool,
    pub cpu_bind_type_set: bool,
    pub kill_on_bad_exit: Option<i32>,
}

/// The extension belonging to the active front-end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "context", rename_all = "lowercase")]
pub enum ContextOptions {
    Alloc(AllocOptions),
    Batch(BatchOptions),
    Step(StepOptions),
}

/// Resolved job configuration.
///
/// Shared fields are `None` (or their type's default) until an option sets
/// them. Exactly one context extension is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobOptions {
    pub account: Option<String>,
    pub acctg_freq: Option<String>,
    pub begin: Option<i64>,
    pub burst_buffer: Option<String>,
    pub cluster_constraint: Option<String>,
    pub chdir: Option<String>,
    pub clusters: Option<String>,
    pub comment: Option<String>,
    pub constraint: Option<String>,
    pub contiguous: bool,
    pub core_spec: CoreSpec,
    pub cpu_freq: CpuFreq,
    pub cpus_per_gpu: Option<i32>,
    pub deadline: Option<i64>,
    /// Seconds.
    pub delay_boot: Option<u32>,
    pub dependency: Option<String>,
    pub distribution: Option<Distribution>,
    pub exclude: Option<String>,
    pub shared: Option<SharedMode>,
    pub layout: SocketCoreThread,
    pub extra_set: bool,
    pub threads_per_core_set: bool,
    pub user_env: UserEnv,
    pub gpu_bind: Option<String>,
    pub gpu_freq: Option<String>,
    pub gpus: Option<String>,
    pub gpus_per_node: Option<String>,
    pub gpus_per_socket: Option<String>,
    pub gpus_per_task: Option<String>,
    pub gres: Option<String>,
    pub gres_binding: Option<GresBinding>,
    pub hint: Option<Hint>,
    /// Hint read from the environment, applied at verification time.
    pub hint_env: Option<String>,
    pub hint_set: bool,
    pub hold: bool,
    pub immediate: Option<i32>,
    pub job_name: Option<String>,
    pub licenses: Option<String>,
    pub mail_type: MailType,
    pub mail_user: Option<String>,
    pub mcs_label: Option<String>,
    /// Memory per node, megabytes.
    pub mem: Option<u64>,
    pub mem_bind: MemBind,
    pub mem_per_cpu: Option<u64>,
    pub mem_per_gpu: Option<u64>,
    pub min_cpus: Option<i32>,
    pub network: Option<String>,
    pub nice: Option<i32>,
    pub no_kill: bool,
    pub nodefile: Option<String>,
    pub nodelist: Option<String>,
    pub overcommit: bool,
    pub partition: Option<String>,
    pub power: PowerFlags,
    pub priority: Option<Priority>,
    pub profile: Option<ProfileFlags>,
    pub qos: Option<String>,
    pub reboot: bool,
    pub reservation: Option<String>,
    pub warn_signal: Option<WarnSignal>,
    pub spread_job: bool,
    pub req_switch: Option<i32>,
    /// Seconds.
    pub wait4switch: Option<u32>,
    /// Minutes.
    pub time_limit: Option<u32>,
    /// Minutes.
    pub time_min: Option<u32>,
    /// Megabytes.
    pub tmp_disk: Option<u64>,
    pub use_min_nodes: bool,
    pub verbose: i32,
    pub wckey: Option<String>,

    pub cpus_per_task: Option<i32>,
    pub ntasks: i32,
    pub ntasks_set: bool,
    pub nodes: NodeRange,
    pub nodes_set: bool,
    pub ntasks_per_node: Option<i32>,
    pub ntasks_per_socket: Option<i32>,
    pub ntasks_per_core: Option<u32>,
    pub ntasks_per_core_set: bool,
    pub quiet: i32,
    pub uid: u32,
    pub gid: u32,

    /// Step-launch memory binding defaults to sorted.
    #[serde(skip)]
    pub launch_mem_sort: bool,

    #[serde(flatten)]
    pub ext: ContextOptions,
}

impl JobOptions {
    pub fn new(ctx: Context) -> Self {
        let ext = match ctx {
            Context::Alloc => ContextOptions::Alloc(AllocOptions::default()),
            Context::Batch => ContextOptions::Batch(BatchOptions::default()),
            Context::Step => ContextOptions::Step(StepOptions::default()),
        };
        Self {
            account: None,
            acctg_freq: None,
            begin: None,
            burst_buffer: None,
            cluster_constraint: None,
            chdir: None,
            clusters: None,
            comment: None,
            constraint: None,
            contiguous: false,
            core_spec: CoreSpec::Unset,
            cpu_freq: CpuFreq::default(),
            cpus_per_gpu: None,
            deadline: None,
            delay_boot: None,
            dependency: None,
            distribution: None,
            exclude: None,
            shared: None,
            layout: SocketCoreThread::default(),
            extra_set: false,
            threads_per_core_set: false,
            user_env: UserEnv::default(),
            gpu_bind: None,
            gpu_freq: None,
            gpus: None,
            gpus_per_node: None,
            gpus_per_socket: None,
            gpus_per_task: None,
            gres: None,
            gres_binding: None,
            hint: None,
            hint_env: None,
            hint_set: false,
            hold: false,
            immediate: None,
            job_name: None,
            licenses: None,
            mail_type: MailType::default(),
            mail_user: None,
            mcs_label: None,
            mem: None,
            mem_bind: MemBind::default(),
            mem_per_cpu: None,
            mem_per_gpu: None,
            min_cpus: None,
            network: None,
            nice: None,
            no_kill: false,
            nodefile: None,
            nodelist: None,
            overcommit: false,
            partition: None,
            power: PowerFlags::default(),
            priority: None,
            profile: None,
            qos: None,
            reboot: false,
            reservation: None,
            warn_signal: None,
            spread_job: false,
            req_switch: None,
            wait4switch: None,
            time_limit: None,
            time_min: None,
            tmp_disk: None,
            use_min_nodes: false,
            verbose: 0,
            wckey: None,
            cpus_per_task: None,
            ntasks: 1,
            ntasks_set: false,
            nodes: NodeRange::default(),
            nodes_set: false,
            ntasks_per_node: None,
            ntasks_per_socket: None,
            ntasks_per_core: None,
            ntasks_per_core_set: false,
            quiet: 0,
            uid: 0,
            gid: 0,
            launch_mem_sort: false,
            ext,
        }
    }

    pub fn context(&self) -> Context {
        match self.ext {
            ContextOptions::Alloc(_) => Context::Alloc,
            ContextOptions::Batch(_) => Context::Batch,
            ContextOptions::Step(_) => Context::Step,
        }
    }

    pub fn alloc(&self) -> Option<&AllocOptions> {
        match &self.ext {
            ContextOptions::Alloc(a) => Some(a),
            _ => None,
        }
    }

    pub fn alloc_mut(&mut self) -> Option<&mut AllocOptions> {
        match &mut self.ext {
            ContextOptions::Alloc(a) => Some(a),
            _ => None,
        }
    }

    pub fn batch(&self) -> Option<&BatchOptions> {
        match &self.ext {
            ContextOptions::Batch(b) => Some(b),
            _ => None,
        }
    }

    pub fn batch_mut(&mut self) -> Option<&mut BatchOptions> {
        match &mut self.ext {
            ContextOptions::Batch(b) => Some(b),
            _ => None,
        }
    }

    pub fn step(&self) -> Option<&StepOptions> {
        match &self.ext {
            ContextOptions::Step(s) => Some(s),
            _ => None,
        }
    }

    pub fn step_mut(&mut self) -> Option<&mut StepOptions> {
        match &mut self.ext {
            ContextOptions::Step(s) => Some(s),
            _ => None,
        }
    }

    /// Node-wait setting of the front-ends that have one.
    pub fn wait_all_nodes(&self) -> Option<u16> {
        match &self.ext {
            ContextOptions::Alloc(a) => a.wait_all_nodes,
            ContextOptions::Batch(b) => b.wait_all_nodes,
            ContextOptions::Step(_) => None,
        }
    }

    pub fn wait_all_nodes_mut(&mut self) -> Option<&mut Option<u16>> {
        match &mut self.ext {
            ContextOptions::Alloc(a) => Some(&mut a.wait_all_nodes),
            ContextOptions::Batch(b) => Some(&mut b.wait_all_nodes),
            ContextOptions::Step(_) => None,
        }
    }

    /// Restore the fields no descriptor owns.
    ///
    /// The first pass establishes job-wide values; every pass clears the
    /// per-component bookkeeping. Runs before the registry reset.
    pub fn apply_defaults(&mut self, first_pass: bool) {
        if first_pass {
            // SAFETY: getuid/getgid cannot fail and touch no memory.
            self.uid = unsafe { libc::getuid() };
            self.gid = unsafe { libc::getgid() };
        } else if self.alloc().is_some_and(|a| a.default_job_name) {
            self.job_name = None;
        }

        if let Some(alloc) = self.alloc_mut() {
            alloc.default_job_name = false;
        }
        self.hint_env = None;
        self.hint_set = false;
    }

    /// Pack the independent job flag fields into the wire bit set.
    pub fn job_flags(&self) -> u32 {
        let mut flags = 0;
        if self.spread_job {
            flags |= job_flags::SPREAD_JOB;
        }
        if self.use_min_nodes {
            flags |= job_flags::USE_MIN_NODES;
        }
        match self.gres_binding {
            Some(GresBinding::DisableBinding) => flags |= job_flags::GRES_DISABLE_BIND,
            Some(GresBinding::EnforceBinding) => flags |= job_flags::GRES_ENFORCE_BIND,
            None => {}
        }
        flags
    }
}
