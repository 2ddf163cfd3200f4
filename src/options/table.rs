//! The option table shared by every front-end.
//!
//! Common options come first in alphabetical order, followed by the options
//! owned by the front-ends themselves. Order decides which descriptor wins
//! when two share a code, and the order of the diagnostic report.

use std::path::Path;

use crate::codec::{
    make_time_str, mbytes_to_str, mins_to_time_str, parse_acctg_freq, parse_full_int, parse_int,
    parse_time, secs_to_time_str, sig_name_to_num, sig_num_to_name, str_to_mbytes,
    time_str_to_mins, time_str_to_secs, Bell, CpuFreq, Distribution, GresBinding, Hint, MailType,
    MemBind, NodeRange, PowerFlags, Priority, ProfileFlags, SharedMode, SocketCoreThread, Switches,
    UserEnv, ValueError, WarnSignal, INFINITE,
};
use crate::options::builders::{
    bool_option, field, int_option, mbytes_option, parsed_option, required, show, string_option,
    Field,
};
use crate::options::codes;
use crate::options::context::Context;
use crate::options::descriptor::{
    DescriptorBuilder, DescriptorError, FlagArity, OptCode, OptionDescriptor,
};
use crate::state::{CoreSpec, JobOptions};

/// Largest accepted `--nice` adjustment.
const NICE_LIMIT: u64 = 0x8000_0000 - 3;
/// `--nice` without a value.
const DEFAULT_NICE: i64 = 100;

/// Build every descriptor, in registry order.
pub fn descriptors() -> Result<Vec<OptionDescriptor>, DescriptorError> {
    common()
        .into_iter()
        .chain(front_end())
        .map(DescriptorBuilder::build)
        .collect()
}

fn common() -> Vec<DescriptorBuilder> {
    vec![
        string_option("account", codes::ACCOUNT, field!(account)),
        parsed_option("acctg-freq", codes::ACCTG_FREQ, field!(acctg_freq), parse_acctg_freq),
        string_option("bb", codes::BURST_BUFFER, field!(burst_buffer)).reset_each_pass(),
        timestamp_option("begin", codes::BEGIN, field!(begin)),
        OptionDescriptor::flag("bell", codes::BELL, FlagArity::NoValue)
            .context_setter(Context::Alloc, |opts, _| {
                set_bell(opts, Bell::Always);
                Ok(())
            })
            .getter(show_bell)
            .resetter(|opts| set_bell(opts, Bell::default())),
        OptionDescriptor::flag("chdir", codes::CHDIR, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                opts.chdir = Some(absolute(required("chdir", arg)?)?);
                Ok(())
            })
            .getter(|opts| show(&opts.chdir))
            .resetter(|opts| {
                opts.chdir = match opts.context() {
                    Context::Alloc => None,
                    _ => std::env::current_dir().ok().map(|p| p.display().to_string()),
                };
            }),
        string_option("cluster-constraint", codes::CLUSTER_CONSTRAINT, field!(cluster_constraint)),
        string_option("clusters", codes::CLUSTERS, field!(clusters)).alias("cluster"),
        string_option("comment", codes::COMMENT, field!(comment)),
        string_option("constraint", codes::CONSTRAINT, field!(constraint)).reset_each_pass(),
        bool_option("contiguous", codes::CONTIGUOUS, field!(contiguous)).reset_each_pass(),
        OptionDescriptor::flag("core-spec", codes::CORE_SPEC, FlagArity::RequiresValue)
            .setter(|opts, arg| set_core_spec(opts, CoreSpec::Cores(spec_count("core-spec", arg)?)))
            .getter(|opts| match opts.core_spec {
                CoreSpec::Cores(n) => n.to_string(),
                _ => "unset".to_string(),
            })
            .resetter(reset_core_spec)
            .reset_each_pass(),
        OptionDescriptor::flag("cpu-freq", codes::CPU_FREQ, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                opts.cpu_freq = CpuFreq::parse(required("cpu-freq", arg)?)?;
                Ok(())
            })
            .getter(|opts| opts.cpu_freq.to_string())
            .resetter(|opts| opts.cpu_freq = CpuFreq::default())
            .reset_each_pass(),
        int_option("cpus-per-gpu", codes::CPUS_PER_GPU, field!(cpus_per_gpu), true),
        timestamp_option("deadline", codes::DEADLINE, field!(deadline)),
        OptionDescriptor::flag("delay-boot", codes::DELAY_BOOT, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                let mins = time_str_to_mins(required("delay-boot", arg)?)?;
                opts.delay_boot = Some(if mins == INFINITE { INFINITE } else { mins.saturating_mul(60) });
                Ok(())
            })
            .getter(|opts| opts.delay_boot.map_or_else(|| "unset".to_string(), secs_to_time_str))
            .resetter(|opts| opts.delay_boot = None),
        string_option("dependency", codes::DEPENDENCY, field!(dependency)),
        parsed_option("distribution", codes::DISTRIBUTION, field!(distribution), Distribution::parse)
            .reset_each_pass(),
        string_option("exclude", codes::EXCLUDE, field!(exclude)),
        OptionDescriptor::flag("exclusive", codes::EXCLUSIVE, FlagArity::OptionalValue)
            .setter(|opts, arg| {
                let mode = SharedMode::parse_exclusive(arg)?;
                opts.shared = Some(mode);
                if mode == SharedMode::Exclusive {
                    if let Some(step) = opts.step_mut() {
                        step.exclusive = true;
                    }
                }
                Ok(())
            })
            .getter(|opts| show(&opts.shared))
            .resetter(reset_shared)
            .reset_each_pass(),
        OptionDescriptor::flag("extra-node-info", codes::EXTRA_NODE_INFO, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                let layout = SocketCoreThread::parse(required("extra-node-info", arg)?)?;
                opts.layout = layout;
                opts.extra_set = true;
                if layout.threads.is_some() {
                    opts.threads_per_core_set = true;
                }
                Ok(())
            })
            .getter(|opts| opts.layout.to_string())
            .resetter(|opts| {
                opts.layout = SocketCoreThread::default();
                opts.extra_set = false;
                opts.threads_per_core_set = false;
            })
            .reset_each_pass(),
        OptionDescriptor::flag("get-user-env", codes::GET_USER_ENV, FlagArity::OptionalValue)
            .context_setter(Context::Alloc, set_user_env)
            .context_setter(Context::Batch, set_user_env)
            .getter(|opts| opts.user_env.to_string())
            .resetter(|opts| opts.user_env = UserEnv::default()),
        string_option("gpu-bind", codes::GPU_BIND, field!(gpu_bind)),
        string_option("gpu-freq", codes::GPU_FREQ, field!(gpu_freq)),
        string_option("gpus", codes::GPUS, field!(gpus)),
        string_option("gpus-per-node", codes::GPUS_PER_NODE, field!(gpus_per_node)),
        string_option("gpus-per-socket", codes::GPUS_PER_SOCKET, field!(gpus_per_socket)),
        string_option("gpus-per-task", codes::GPUS_PER_TASK, field!(gpus_per_task)),
        string_option("gres", codes::GRES, field!(gres)).reset_each_pass(),
        parsed_option("gres-flags", codes::GRES_FLAGS, field!(gres_binding), GresBinding::parse)
            .reset_each_pass(),
        OptionDescriptor::flag("hint", codes::HINT, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                let hint = Hint::parse(required("hint", arg)?)?;
                hint.apply(&mut opts.layout, &mut opts.ntasks_per_core);
                opts.hint = Some(hint);
                opts.hint_set = true;
                opts.ntasks_per_core_set = true;
                opts.threads_per_core_set = true;
                Ok(())
            })
            .getter(|opts| show(&opts.hint))
            .resetter(|opts| {
                opts.hint = None;
                opts.hint_set = false;
            })
            .reset_each_pass(),
        bool_option("hold", codes::HOLD, field!(hold)),
        OptionDescriptor::flag("immediate", codes::IMMEDIATE, FlagArity::OptionalValue)
            .context_setter(Context::Alloc, set_immediate)
            .context_setter(Context::Step, set_immediate)
            .getter(|opts| show(&opts.immediate))
            .resetter(|opts| opts.immediate = None),
        OptionDescriptor::flag("job-name", codes::JOB_NAME, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                opts.job_name = Some(required("job-name", arg)?.to_string());
                if let Some(step) = opts.step_mut() {
                    step.job_name_set_cmd = true;
                }
                Ok(())
            })
            .getter(|opts| show(&opts.job_name))
            .resetter(|opts| {
                opts.job_name = None;
                if let Some(step) = opts.step_mut() {
                    step.job_name_set_cmd = false;
                }
            }),
        OptionDescriptor::flag("kill-command", codes::KILL_COMMAND, FlagArity::OptionalValue)
            .context_setter(Context::Alloc, set_kill_command)
            .getter(|opts| {
                opts.alloc()
                    .and_then(|a| a.kill_command)
                    .map_or_else(|| "unset".to_string(), sig_num_to_name)
            })
            .resetter(|opts| {
                if let Some(alloc) = opts.alloc_mut() {
                    alloc.kill_command = None;
                }
            }),
        string_option("licenses", codes::LICENSES, field!(licenses)).reset_each_pass(),
        OptionDescriptor::flag("mail-type", codes::MAIL_TYPE, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                let parsed = MailType::parse(required("mail-type", arg)?)?;
                opts.mail_type = MailType(opts.mail_type.0 | parsed.0);
                Ok(())
            })
            .getter(|opts| opts.mail_type.to_string())
            .resetter(|opts| opts.mail_type = MailType::default())
            .reset_each_pass(),
        string_option("mail-user", codes::MAIL_USER, field!(mail_user)).reset_each_pass(),
        string_option("mcs-label", codes::MCS_LABEL, field!(mcs_label)),
        OptionDescriptor::flag("mem", codes::MEM, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                opts.mem = Some(str_to_mbytes(required("mem", arg)?)?);
                if opts.context() == Context::Step {
                    opts.mem_per_cpu = None;
                }
                Ok(())
            })
            .getter(|opts| mbytes_to_str(opts.mem))
            .resetter(|opts| opts.mem = None)
            .reset_each_pass(),
        OptionDescriptor::flag("mem-bind", codes::MEM_BIND, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                opts.mem_bind = MemBind::parse(required("mem-bind", arg)?)?;
                Ok(())
            })
            .getter(|opts| opts.mem_bind.to_string())
            .resetter(|opts| {
                let sort = opts.context() == Context::Step && opts.launch_mem_sort;
                opts.mem_bind = MemBind::with_sort(sort);
            })
            .reset_each_pass(),
        mbytes_option("mem-per-cpu", codes::MEM_PER_CPU, field!(mem_per_cpu)).reset_each_pass(),
        mbytes_option("mem-per-gpu", codes::MEM_PER_GPU, field!(mem_per_gpu)),
        int_option("mincpus", codes::MINCPUS, field!(min_cpus), true).reset_each_pass(),
        string_option("network", codes::NETWORK, field!(network)).reset_each_pass(),
        OptionDescriptor::flag("nice", codes::NICE, FlagArity::OptionalValue)
            .setter(set_nice)
            .getter(|opts| show(&opts.nice))
            .resetter(|opts| opts.nice = None),
        OptionDescriptor::flag("no-bell", codes::NO_BELL, FlagArity::NoValue)
            .context_setter(Context::Alloc, |opts, _| {
                set_bell(opts, Bell::Never);
                Ok(())
            })
            .getter(show_bell)
            .resetter(|opts| set_bell(opts, Bell::default())),
        OptionDescriptor::flag("no-kill", codes::NO_KILL, FlagArity::OptionalValue)
            .setter(|opts, arg| {
                opts.no_kill = match arg {
                    None => true,
                    Some(v) if v.eq_ignore_ascii_case("set") => true,
                    Some(v) if v.eq_ignore_ascii_case("off") || v.eq_ignore_ascii_case("no") => false,
                    Some(v) => {
                        return Err(ValueError::new(format!(
                            "Invalid --no-kill specification \"{}\"",
                            v
                        )))
                    }
                };
                Ok(())
            })
            .getter(|opts| if opts.no_kill { "set" } else { "unset" }.to_string())
            .resetter(|opts| opts.no_kill = false),
        OptionDescriptor::flag("nodefile", codes::NODEFILE, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                opts.nodefile = Some(required("nodefile", arg)?.to_string());
                opts.nodelist = None;
                Ok(())
            })
            .getter(|opts| show(&opts.nodefile))
            .resetter(|opts| opts.nodefile = None)
            .reset_each_pass(),
        OptionDescriptor::flag("nodelist", codes::NODELIST, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                opts.nodelist = Some(required("nodelist", arg)?.to_string());
                opts.nodefile = None;
                Ok(())
            })
            .getter(|opts| show(&opts.nodelist))
            .resetter(|opts| opts.nodelist = None)
            .reset_each_pass(),
        bool_option("overcommit", codes::OVERCOMMIT, field!(overcommit)).reset_each_pass(),
        OptionDescriptor::flag("oversubscribe", codes::OVERSUBSCRIBE, FlagArity::NoValue)
            .setter(|opts, _| {
                opts.shared = Some(SharedMode::OverSubscribe);
                if let Some(step) = opts.step_mut() {
                    step.exclusive = false;
                }
                Ok(())
            })
            .getter(|opts| show(&opts.shared))
            .resetter(reset_shared)
            .reset_each_pass(),
        string_option("partition", codes::PARTITION, field!(partition)).reset_each_pass(),
        OptionDescriptor::flag("power", codes::POWER, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                opts.power = PowerFlags::parse(required("power", arg)?)?;
                Ok(())
            })
            .getter(|opts| opts.power.to_string())
            .resetter(|opts| opts.power = PowerFlags::default())
            .reset_each_pass(),
        parsed_option("priority", codes::PRIORITY, field!(priority), Priority::parse),
        parsed_option("profile", codes::PROFILE, field!(profile), ProfileFlags::parse),
        string_option("qos", codes::QOS, field!(qos)),
        bool_option("reboot", codes::REBOOT, field!(reboot)),
        string_option("reservation", codes::RESERVATION, field!(reservation)),
        parsed_option("signal", codes::SIGNAL, field!(warn_signal), WarnSignal::parse),
        bool_option("spread-job", codes::SPREAD_JOB, field!(spread_job)).reset_each_pass(),
        OptionDescriptor::flag("switches", codes::SWITCHES, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                let switches = Switches::parse(required("switches", arg)?)?;
                opts.req_switch = Some(switches.count);
                if let Some(wait) = switches.wait_secs {
                    opts.wait4switch = Some(wait);
                }
                Ok(())
            })
            .getter(|opts| show(&opts.req_switch))
            .resetter(|opts| {
                opts.req_switch = None;
                opts.wait4switch = None;
            })
            .reset_each_pass(),
        OptionDescriptor::env_only("switch_req", codes::SWITCH_REQ, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                opts.req_switch = Some(parse_int("switch count", required("switch_req", arg)?, true)?);
                Ok(())
            })
            .getter(|opts| show(&opts.req_switch))
            .resetter(|opts| opts.req_switch = None)
            .reset_each_pass(),
        OptionDescriptor::env_only("switch_wait", codes::SWITCH_WAIT, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                opts.wait4switch = Some(time_str_to_secs(required("switch_wait", arg)?)?);
                Ok(())
            })
            .getter(|opts| opts.wait4switch.map_or_else(|| "unset".to_string(), secs_to_time_str))
            .resetter(|opts| opts.wait4switch = None)
            .reset_each_pass(),
        OptionDescriptor::flag("thread-spec", codes::THREAD_SPEC, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                set_core_spec(opts, CoreSpec::Threads(spec_count("thread-spec", arg)?))
            })
            .getter(|opts| match opts.core_spec {
                CoreSpec::Threads(n) => n.to_string(),
                _ => "unset".to_string(),
            })
            .resetter(reset_core_spec)
            .reset_each_pass(),
        limit_option("time", codes::TIME, field!(time_limit)),
        limit_option("time-min", codes::TIME_MIN, field!(time_min)),
        mbytes_option("tmp", codes::TMP, field!(tmp_disk)).reset_each_pass(),
        bool_option("use-min-nodes", codes::USE_MIN_NODES, field!(use_min_nodes)).reset_each_pass(),
        OptionDescriptor::flag("verbose", codes::VERBOSE, FlagArity::NoValue)
            .setter(|opts, arg| {
                match arg {
                    None => opts.verbose += 1,
                    Some(level) => opts.verbose = parse_int("--verbose", level, false)?,
                }
                Ok(())
            })
            .getter(|opts| opts.verbose.to_string())
            .resetter(|opts| opts.verbose = 0)
            .early_pass(),
        OptionDescriptor::flag("wait-all-nodes", codes::WAIT_ALL_NODES, FlagArity::RequiresValue)
            .context_setter(Context::Alloc, set_wait_all_nodes)
            .context_setter(Context::Batch, set_wait_all_nodes)
            .getter(|opts| show(&opts.wait_all_nodes()))
            .resetter(|opts| {
                if let Some(slot) = opts.wait_all_nodes_mut() {
                    *slot = None;
                }
            }),
        string_option("wckey", codes::WCKEY, field!(wckey)),
    ]
}

fn front_end() -> Vec<DescriptorBuilder> {
    vec![
        int_option("cpus-per-task", codes::CPUS_PER_TASK, field!(cpus_per_task), true)
            .reset_each_pass(),
        OptionDescriptor::flag("ntasks", codes::NTASKS, FlagArity::RequiresValue)
            .alias("tasks")
            .setter(|opts, arg| {
                opts.ntasks = parse_int("--ntasks", required("ntasks", arg)?, true)?;
                opts.ntasks_set = true;
                Ok(())
            })
            .getter(|opts| opts.ntasks.to_string())
            .resetter(|opts| {
                opts.ntasks = 1;
                opts.ntasks_set = false;
            })
            .reset_each_pass(),
        OptionDescriptor::flag("nodes", codes::NODES, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                opts.nodes = NodeRange::parse(required("nodes", arg)?)?;
                opts.nodes_set = true;
                Ok(())
            })
            .getter(|opts| opts.nodes.to_string())
            .resetter(|opts| {
                opts.nodes = NodeRange::default();
                opts.nodes_set = false;
            })
            .reset_each_pass(),
        OptionDescriptor::flag("quiet", codes::QUIET, FlagArity::NoValue)
            .setter(|opts, _| {
                opts.quiet += 1;
                Ok(())
            })
            .getter(|opts| opts.quiet.to_string())
            .resetter(|opts| opts.quiet = 0),
        int_option("ntasks-per-node", codes::NTASKS_PER_NODE, field!(ntasks_per_node), true)
            .alias("tasks-per-node")
            .reset_each_pass(),
        int_option("ntasks-per-socket", codes::NTASKS_PER_SOCKET, field!(ntasks_per_socket), true)
            .reset_each_pass(),
        OptionDescriptor::flag("ntasks-per-core", codes::NTASKS_PER_CORE, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                let n = parse_int("--ntasks-per-core", required("ntasks-per-core", arg)?, true)?;
                opts.ntasks_per_core = Some(n.unsigned_abs());
                opts.ntasks_per_core_set = true;
                Ok(())
            })
            .getter(|opts| show(&opts.ntasks_per_core))
            .resetter(|opts| {
                opts.ntasks_per_core = None;
                opts.ntasks_per_core_set = false;
            })
            .reset_each_pass(),
        OptionDescriptor::flag("sockets-per-node", codes::SOCKETS_PER_NODE, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                let n = SocketCoreThread::parse_count("--sockets-per-node", required("sockets-per-node", arg)?)?;
                opts.layout.sockets = Some(n);
                Ok(())
            })
            .getter(|opts| show(&opts.layout.sockets))
            .resetter(|opts| opts.layout.sockets = None)
            .reset_each_pass(),
        OptionDescriptor::flag("cores-per-socket", codes::CORES_PER_SOCKET, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                let n = SocketCoreThread::parse_count("--cores-per-socket", required("cores-per-socket", arg)?)?;
                opts.layout.cores = Some(n);
                Ok(())
            })
            .getter(|opts| show(&opts.layout.cores))
            .resetter(|opts| opts.layout.cores = None)
            .reset_each_pass(),
        OptionDescriptor::flag("threads-per-core", codes::THREADS_PER_CORE, FlagArity::RequiresValue)
            .setter(|opts, arg| {
                let n = SocketCoreThread::parse_count("--threads-per-core", required("threads-per-core", arg)?)?;
                opts.layout.threads = Some(n);
                opts.threads_per_core_set = true;
                Ok(())
            })
            .getter(|opts| show(&opts.layout.threads))
            .resetter(|opts| {
                opts.layout.threads = None;
                opts.threads_per_core_set = false;
            })
            .reset_each_pass(),
        OptionDescriptor::flag("no-shell", codes::NO_SHELL, FlagArity::NoValue)
            .context_setter(Context::Alloc, |opts, _| {
                if let Some(alloc) = opts.alloc_mut() {
                    alloc.no_shell = true;
                }
                Ok(())
            })
            .getter(|opts| {
                let set = opts.alloc().is_some_and(|a| a.no_shell);
                if set { "set" } else { "unset" }.to_string()
            })
            .resetter(|opts| {
                if let Some(alloc) = opts.alloc_mut() {
                    alloc.no_shell = false;
                }
            }),
        OptionDescriptor::flag("kill-on-bad-exit", codes::KILL_ON_BAD_EXIT, FlagArity::OptionalValue)
            .context_setter(Context::Step, |opts, arg| {
                let value = match arg {
                    None => 1,
                    Some(v) => parse_int("--kill-on-bad-exit", v, false)?,
                };
                if let Some(step) = opts.step_mut() {
                    step.kill_on_bad_exit = Some(value);
                }
                Ok(())
            })
            .getter(|opts| show(&opts.step().and_then(|s| s.kill_on_bad_exit)))
            .resetter(|opts| {
                if let Some(step) = opts.step_mut() {
                    step.kill_on_bad_exit = None;
                }
            }),
    ]
}

// ============================================================================
// Shapes used more than once
// ============================================================================

/// Absolute time such as `--begin`.
fn timestamp_option(name: &'static str, code: OptCode, field: Field<Option<i64>>) -> DescriptorBuilder {
    OptionDescriptor::flag(name, code, FlagArity::RequiresValue)
        .setter(move |opts, arg| {
            *(field.get_mut)(opts) = Some(parse_time(required(name, arg)?)?);
            Ok(())
        })
        .getter(move |opts| make_time_str(*(field.get)(opts)))
        .resetter(move |opts| *(field.get_mut)(opts) = None)
}

/// Time limit in minutes; zero means no limit.
fn limit_option(name: &'static str, code: OptCode, field: Field<Option<u32>>) -> DescriptorBuilder {
    OptionDescriptor::flag(name, code, FlagArity::RequiresValue)
        .setter(move |opts, arg| {
            let mins = time_str_to_mins(required(name, arg)?)?;
            *(field.get_mut)(opts) = Some(if mins == 0 { INFINITE } else { mins });
            Ok(())
        })
        .getter(move |opts| (field.get)(opts).map_or_else(|| "unset".to_string(), mins_to_time_str))
        .resetter(move |opts| *(field.get_mut)(opts) = None)
}

// ============================================================================
// Setter helpers
// ============================================================================

fn absolute(path: &str) -> Result<String, ValueError> {
    let path = Path::new(path);
    if path.is_absolute() {
        return Ok(path.display().to_string());
    }
    let cwd = std::env::current_dir()
        .map_err(|e| ValueError::new(format!("cannot resolve working directory: {}", e)))?;
    Ok(cwd.join(path).display().to_string())
}

fn set_bell(opts: &mut JobOptions, bell: Bell) {
    if let Some(alloc) = opts.alloc_mut() {
        alloc.bell = bell;
    }
}

fn show_bell(opts: &JobOptions) -> String {
    opts.alloc().map_or_else(|| "unset".to_string(), |a| a.bell.to_string())
}

fn spec_count(name: &str, arg: Option<&str>) -> Result<u16, ValueError> {
    let label = format!("--{}", name);
    let n = parse_int(&label, required(name, arg)?, false)?;
    u16::try_from(n).map_err(|_| ValueError::new(format!("Invalid {} value \"{}\"", label, n)))
}

fn set_core_spec(opts: &mut JobOptions, spec: CoreSpec) -> Result<(), ValueError> {
    opts.core_spec = spec;
    if let Some(step) = opts.step_mut() {
        step.core_spec_set = true;
    }
    Ok(())
}

fn reset_core_spec(opts: &mut JobOptions) {
    opts.core_spec = CoreSpec::Unset;
    if let Some(step) = opts.step_mut() {
        step.core_spec_set = false;
    }
}

fn reset_shared(opts: &mut JobOptions) {
    opts.shared = None;
    if let Some(step) = opts.step_mut() {
        step.exclusive = false;
    }
}

fn set_user_env(opts: &mut JobOptions, arg: Option<&str>) -> Result<(), ValueError> {
    opts.user_env = UserEnv::parse(arg)?;
    Ok(())
}

fn set_immediate(opts: &mut JobOptions, arg: Option<&str>) -> Result<(), ValueError> {
    opts.immediate = Some(match arg {
        None => 1,
        Some(v) => parse_int("--immediate", v, true)?,
    });
    Ok(())
}

fn set_kill_command(opts: &mut JobOptions, arg: Option<&str>) -> Result<(), ValueError> {
    let signal = match arg {
        None => libc::SIGTERM,
        Some(name) => sig_name_to_num(name).ok_or_else(|| {
            ValueError::new(format!("Invalid --kill-command specification \"{}\"", name))
        })?,
    };
    if let Some(alloc) = opts.alloc_mut() {
        alloc.kill_command = Some(signal);
    }
    Ok(())
}

fn set_nice(opts: &mut JobOptions, arg: Option<&str>) -> Result<(), ValueError> {
    let nice = match arg {
        None => DEFAULT_NICE,
        Some(v) => parse_full_int(v)
            .ok_or_else(|| ValueError::new(format!("Invalid --nice value \"{}\"", v)))?,
    };
    if nice.unsigned_abs() > NICE_LIMIT {
        return Err(ValueError::new(format!(
            "Nice value out of range (+/- {}). Value ignored",
            NICE_LIMIT
        )));
    }
    opts.nice = Some(nice as i32);
    Ok(())
}

fn set_wait_all_nodes(opts: &mut JobOptions, arg: Option<&str>) -> Result<(), ValueError> {
    let value = parse_int("--wait-all-nodes", required("wait-all-nodes", arg)?, false)?;
    if !(0..=1).contains(&value) {
        return Err(ValueError::new(format!("Invalid --wait-all-nodes argument: {}", value)));
    }
    if let Some(slot) = opts.wait_all_nodes_mut() {
        *slot = Some(value as u16);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::context::select_setter;

    fn table() -> Vec<OptionDescriptor> {
        descriptors().expect("well-formed table")
    }

    fn set(table: &[OptionDescriptor], opts: &mut JobOptions, name: &str, arg: Option<&str>) -> Result<(), ValueError> {
        let desc = table
            .iter()
            .find(|d| d.display_name() == name && select_setter(d, opts.context()).is_some())
            .unwrap_or_else(|| panic!("no reachable descriptor {name}"));
        select_setter(desc, opts.context()).unwrap()(opts, arg)
    }

    #[test]
    fn table_builds_without_errors() {
        assert!(!table().is_empty());
    }

    #[test]
    fn step_memory_clears_per_cpu_memory() {
        let t = table();
        let mut opts = JobOptions::new(Context::Step);
        set(&t, &mut opts, "mem-per-cpu", Some("100")).unwrap();
        set(&t, &mut opts, "mem", Some("1G")).unwrap();
        assert_eq!(opts.mem, Some(1024));
        assert_eq!(opts.mem_per_cpu, None);

        let mut opts = JobOptions::new(Context::Batch);
        set(&t, &mut opts, "mem-per-cpu", Some("100")).unwrap();
        set(&t, &mut opts, "mem", Some("1G")).unwrap();
        assert_eq!(opts.mem_per_cpu, Some(100));
    }

    #[test]
    fn nodefile_and_nodelist_exclude_each_other() {
        let t = table();
        let mut opts = JobOptions::new(Context::Batch);
        set(&t, &mut opts, "nodelist", Some("n[1-4]")).unwrap();
        set(&t, &mut opts, "nodefile", Some("hosts.txt")).unwrap();
        assert_eq!(opts.nodelist, None);
        assert_eq!(opts.nodefile.as_deref(), Some("hosts.txt"));
    }

    #[test]
    fn exclusive_and_oversubscribe_toggle_step_exclusivity() {
        let t = table();
        let mut opts = JobOptions::new(Context::Step);
        set(&t, &mut opts, "exclusive", None).unwrap();
        assert_eq!(opts.shared, Some(SharedMode::Exclusive));
        assert!(opts.step().unwrap().exclusive);

        set(&t, &mut opts, "oversubscribe", None).unwrap();
        assert_eq!(opts.shared, Some(SharedMode::OverSubscribe));
        assert!(!opts.step().unwrap().exclusive);

        set(&t, &mut opts, "exclusive", Some("user")).unwrap();
        assert_eq!(opts.shared, Some(SharedMode::User));
        assert!(!opts.step().unwrap().exclusive);
    }

    #[test]
    fn mail_type_accumulates_across_uses() {
        let t = table();
        let mut opts = JobOptions::new(Context::Batch);
        set(&t, &mut opts, "mail-type", Some("BEGIN")).unwrap();
        set(&t, &mut opts, "mail-type", Some("END")).unwrap();
        assert!(opts.mail_type.contains(MailType::BEGIN));
        assert!(opts.mail_type.contains(MailType::END));
    }

    #[test]
    fn nice_defaults_and_bounds() {
        let t = table();
        let mut opts = JobOptions::new(Context::Batch);
        set(&t, &mut opts, "nice", None).unwrap();
        assert_eq!(opts.nice, Some(100));
        set(&t, &mut opts, "nice", Some("-5")).unwrap();
        assert_eq!(opts.nice, Some(-5));
        assert!(set(&t, &mut opts, "nice", Some("2147483646")).is_err());
        assert_eq!(opts.nice, Some(-5));
    }

    #[test]
    fn no_kill_accepts_only_known_words() {
        let t = table();
        let mut opts = JobOptions::new(Context::Alloc);
        set(&t, &mut opts, "no-kill", None).unwrap();
        assert!(opts.no_kill);
        set(&t, &mut opts, "no-kill", Some("off")).unwrap();
        assert!(!opts.no_kill);
        assert!(set(&t, &mut opts, "no-kill", Some("maybe")).is_err());
    }

    #[test]
    fn zero_time_means_unlimited() {
        let t = table();
        let mut opts = JobOptions::new(Context::Batch);
        set(&t, &mut opts, "time", Some("0")).unwrap();
        assert_eq!(opts.time_limit, Some(INFINITE));
        set(&t, &mut opts, "time", Some("1:30:00")).unwrap();
        assert_eq!(opts.time_limit, Some(90));
    }

    #[test]
    fn kill_command_defaults_to_term() {
        let t = table();
        let mut opts = JobOptions::new(Context::Alloc);
        set(&t, &mut opts, "kill-command", None).unwrap();
        assert_eq!(opts.alloc().unwrap().kill_command, Some(libc::SIGTERM));
        set(&t, &mut opts, "kill-command", Some("USR1")).unwrap();
        assert_eq!(opts.alloc().unwrap().kill_command, Some(libc::SIGUSR1));
    }

    #[test]
    fn switches_keep_earlier_wait_when_omitted() {
        let t = table();
        let mut opts = JobOptions::new(Context::Batch);
        set(&t, &mut opts, "switches", Some("2@10:00")).unwrap();
        set(&t, &mut opts, "switches", Some("3")).unwrap();
        assert_eq!(opts.req_switch, Some(3));
        assert_eq!(opts.wait4switch, Some(600));
    }

    #[test]
    fn hint_marks_layout_as_user_chosen() {
        let t = table();
        let mut opts = JobOptions::new(Context::Batch);
        set(&t, &mut opts, "hint", Some("nomultithread")).unwrap();
        assert_eq!(opts.layout.threads, Some(1));
        assert_eq!(opts.ntasks_per_core, Some(1));
        assert!(opts.hint_set && opts.ntasks_per_core_set && opts.threads_per_core_set);
    }

    #[test]
    fn wait_all_nodes_accepts_zero_or_one() {
        let t = table();
        let mut opts = JobOptions::new(Context::Batch);
        set(&t, &mut opts, "wait-all-nodes", Some("1")).unwrap();
        assert_eq!(opts.wait_all_nodes(), Some(1));
        assert!(set(&t, &mut opts, "wait-all-nodes", Some("2")).is_err());
    }
}
