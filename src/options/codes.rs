//! Option codes. Short flags use their character; long-only options are
//! numbered from [`OptCode::LONG_BASE`].

use crate::options::descriptor::OptCode;

pub const ACCOUNT: OptCode = OptCode::short('A');
pub const BEGIN: OptCode = OptCode::short('b');
pub const EXTRA_NODE_INFO: OptCode = OptCode::short('B');
pub const CPUS_PER_TASK: OptCode = OptCode::short('c');
pub const CONSTRAINT: OptCode = OptCode::short('C');
pub const DEPENDENCY: OptCode = OptCode::short('d');
pub const CHDIR: OptCode = OptCode::short('D');
pub const NODEFILE: OptCode = OptCode::short('F');
pub const GPUS: OptCode = OptCode::short('G');
pub const HOLD: OptCode = OptCode::short('H');
pub const IMMEDIATE: OptCode = OptCode::short('I');
pub const JOB_NAME: OptCode = OptCode::short('J');
pub const NO_KILL: OptCode = OptCode::short('k');
/// Shared by `--kill-command` (alloc) and `--kill-on-bad-exit` (step).
pub const KILL_COMMAND: OptCode = OptCode::short('K');
pub const KILL_ON_BAD_EXIT: OptCode = OptCode::short('K');
pub const LICENSES: OptCode = OptCode::short('L');
pub const DISTRIBUTION: OptCode = OptCode::short('m');
pub const CLUSTERS: OptCode = OptCode::short('M');
pub const NTASKS: OptCode = OptCode::short('n');
pub const NODES: OptCode = OptCode::short('N');
pub const OVERCOMMIT: OptCode = OptCode::short('O');
pub const PARTITION: OptCode = OptCode::short('p');
pub const QOS: OptCode = OptCode::short('q');
pub const QUIET: OptCode = OptCode::short('Q');
pub const OVERSUBSCRIBE: OptCode = OptCode::short('s');
pub const CORE_SPEC: OptCode = OptCode::short('S');
pub const TIME: OptCode = OptCode::short('t');
pub const VERBOSE: OptCode = OptCode::short('v');
pub const NODELIST: OptCode = OptCode::short('w');
pub const EXCLUDE: OptCode = OptCode::short('x');

pub const ACCTG_FREQ: OptCode = OptCode::long(1);
pub const BURST_BUFFER: OptCode = OptCode::long(2);
pub const BELL: OptCode = OptCode::long(3);
pub const CLUSTER_CONSTRAINT: OptCode = OptCode::long(4);
pub const COMMENT: OptCode = OptCode::long(5);
pub const CONTIGUOUS: OptCode = OptCode::long(6);
pub const CPU_FREQ: OptCode = OptCode::long(7);
pub const CPUS_PER_GPU: OptCode = OptCode::long(8);
pub const DEADLINE: OptCode = OptCode::long(9);
pub const DELAY_BOOT: OptCode = OptCode::long(10);
pub const EXCLUSIVE: OptCode = OptCode::long(11);
pub const GET_USER_ENV: OptCode = OptCode::long(12);
pub const GPU_BIND: OptCode = OptCode::long(13);
pub const GPU_FREQ: OptCode = OptCode::long(14);
pub const GPUS_PER_NODE: OptCode = OptCode::long(15);
pub const GPUS_PER_SOCKET: OptCode = OptCode::long(16);
pub const GPUS_PER_TASK: OptCode = OptCode::long(17);
pub const GRES: OptCode = OptCode::long(18);
pub const GRES_FLAGS: OptCode = OptCode::long(19);
pub const HINT: OptCode = OptCode::long(20);
pub const MAIL_TYPE: OptCode = OptCode::long(21);
pub const MAIL_USER: OptCode = OptCode::long(22);
pub const MCS_LABEL: OptCode = OptCode::long(23);
pub const MEM: OptCode = OptCode::long(24);
pub const MEM_BIND: OptCode = OptCode::long(25);
pub const MEM_PER_CPU: OptCode = OptCode::long(26);
pub const MEM_PER_GPU: OptCode = OptCode::long(27);
pub const MINCPUS: OptCode = OptCode::long(28);
pub const NETWORK: OptCode = OptCode::long(29);
pub const NICE: OptCode = OptCode::long(30);
pub const NO_BELL: OptCode = OptCode::long(31);
pub const POWER: OptCode = OptCode::long(32);
pub const PRIORITY: OptCode = OptCode::long(33);
pub const PROFILE: OptCode = OptCode::long(34);
pub const REBOOT: OptCode = OptCode::long(35);
pub const RESERVATION: OptCode = OptCode::long(36);
pub const SIGNAL: OptCode = OptCode::long(37);
pub const SPREAD_JOB: OptCode = OptCode::long(38);
pub const SWITCHES: OptCode = OptCode::long(39);
pub const SWITCH_REQ: OptCode = OptCode::long(40);
pub const SWITCH_WAIT: OptCode = OptCode::long(41);
pub const THREAD_SPEC: OptCode = OptCode::long(42);
pub const TIME_MIN: OptCode = OptCode::long(43);
pub const TMP: OptCode = OptCode::long(44);
pub const USE_MIN_NODES: OptCode = OptCode::long(45);
pub const WAIT_ALL_NODES: OptCode = OptCode::long(46);
pub const WCKEY: OptCode = OptCode::long(47);

pub const NTASKS_PER_NODE: OptCode = OptCode::long(50);
pub const NTASKS_PER_SOCKET: OptCode = OptCode::long(51);
pub const NTASKS_PER_CORE: OptCode = OptCode::long(52);
pub const SOCKETS_PER_NODE: OptCode = OptCode::long(53);
pub const CORES_PER_SOCKET: OptCode = OptCode::long(54);
pub const THREADS_PER_CORE: OptCode = OptCode::long(55);
pub const NO_SHELL: OptCode = OptCode::long(56);

/// Codes from here on belong to secondary (plugin) tables.
pub const SECONDARY_BASE: OptCode = OptCode(0x1000);
