//! Enumerated and compound option values.

use std::fmt;

use serde::Serialize;

use super::number::parse_full_int;
use super::ValueError;

fn invalid(option: &str, s: &str) -> ValueError {
    ValueError::new(format!("Invalid {} specification \"{}\"", option, s))
}

// ============================================================================
// Mail notification
// ============================================================================

/// Mail notification events, as a bit set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MailType(pub u16);

impl MailType {
    pub const BEGIN: u16 = 0x0001;
    pub const END: u16 = 0x0002;
    pub const FAIL: u16 = 0x0004;
    pub const REQUEUE: u16 = 0x0008;
    pub const TIME100: u16 = 0x0010;
    pub const TIME90: u16 = 0x0020;
    pub const TIME80: u16 = 0x0040;
    pub const TIME50: u16 = 0x0080;
    pub const STAGE_OUT: u16 = 0x0100;
    pub const ARRAY_TASKS: u16 = 0x0200;
    pub const ALL: u16 = Self::BEGIN | Self::END | Self::FAIL | Self::REQUEUE | Self::STAGE_OUT;

    const NAMES: &'static [(&'static str, u16)] = &[
        ("BEGIN", Self::BEGIN),
        ("END", Self::END),
        ("FAIL", Self::FAIL),
        ("REQUEUE", Self::REQUEUE),
        ("TIME_LIMIT", Self::TIME100),
        ("TIME_LIMIT_90", Self::TIME90),
        ("TIME_LIMIT_80", Self::TIME80),
        ("TIME_LIMIT_50", Self::TIME50),
        ("STAGE_OUT", Self::STAGE_OUT),
        ("ARRAY_TASKS", Self::ARRAY_TASKS),
    ];

    /// Parse a comma-separated event list. `NONE` yields the empty set.
    pub fn parse(s: &str) -> Result<Self, ValueError> {
        let mut bits = 0;
        for token in s.split(',') {
            let token = token.trim().to_ascii_uppercase();
            bits |= match token.as_str() {
                "NONE" => 0,
                "ALL" => Self::ALL,
                _ => Self::NAMES
                    .iter()
                    .find(|(name, _)| *name == token)
                    .map(|(_, bit)| *bit)
                    .ok_or_else(|| invalid("--mail-type", s))?,
            };
        }
        Ok(Self(bits))
    }

    pub fn contains(self, bit: u16) -> bool {
        self.0 & bit == bit
    }
}

impl fmt::Display for MailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(_, bit)| self.contains(*bit))
            .map(|(name, _)| *name)
            .collect();
        if names.is_empty() {
            f.write_str("NONE")
        } else {
            f.write_str(&names.join(","))
        }
    }
}

// ============================================================================
// Accounting profile and power
// ============================================================================

/// Accounting profile data types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProfileFlags(pub u32);

impl ProfileFlags {
    pub const ENERGY: u32 = 0x1;
    pub const TASK: u32 = 0x2;
    pub const LUSTRE: u32 = 0x4;
    pub const NETWORK: u32 = 0x8;
    pub const ALL: u32 = 0xffff_ffff;

    const NAMES: &'static [(&'static str, u32)] = &[
        ("Energy", Self::ENERGY),
        ("Task", Self::TASK),
        ("Lustre", Self::LUSTRE),
        ("Network", Self::NETWORK),
    ];

    pub fn parse(s: &str) -> Result<Self, ValueError> {
        let mut bits = 0;
        for token in s.split(',') {
            let token = token.trim();
            if token.eq_ignore_ascii_case("none") {
                continue;
            }
            if token.eq_ignore_ascii_case("all") {
                bits = Self::ALL;
                continue;
            }
            bits |= Self::NAMES
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(token))
                .map(|(_, bit)| *bit)
                .ok_or_else(|| invalid("--profile", s))?;
        }
        Ok(Self(bits))
    }
}

impl fmt::Display for ProfileFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => f.write_str("None"),
            Self::ALL => f.write_str("All"),
            bits => {
                let names: Vec<&str> = Self::NAMES
                    .iter()
                    .filter(|(_, bit)| bits & bit != 0)
                    .map(|(name, _)| *name)
                    .collect();
                f.write_str(&names.join(","))
            }
        }
    }
}

/// Power management flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PowerFlags(pub u8);

impl PowerFlags {
    pub const LEVEL: u8 = 0x1;

    pub fn parse(s: &str) -> Result<Self, ValueError> {
        let mut bits = 0;
        for token in s.split(',') {
            if token.trim().eq_ignore_ascii_case("level") {
                bits |= Self::LEVEL;
            } else {
                return Err(invalid("--power", s));
            }
        }
        Ok(Self(bits))
    }
}

impl fmt::Display for PowerFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 & Self::LEVEL != 0 {
            f.write_str("level")
        } else {
            f.write_str("unset")
        }
    }
}

// ============================================================================
// Task distribution
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistKind {
    Block,
    Cyclic,
    FCyclic,
    Arbitrary,
    Plane(u32),
}

impl DistKind {
    fn parse_level(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "block" => Some(Self::Block),
            "cyclic" => Some(Self::Cyclic),
            "fcyclic" => Some(Self::FCyclic),
            _ => None,
        }
    }
}

impl fmt::Display for DistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block => f.write_str("block"),
            Self::Cyclic => f.write_str("cyclic"),
            Self::FCyclic => f.write_str("fcyclic"),
            Self::Arbitrary => f.write_str("arbitrary"),
            Self::Plane(size) => write!(f, "plane={}", size),
        }
    }
}

/// Task layout across nodes, sockets and cores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub node: DistKind,
    pub socket: Option<DistKind>,
    pub core: Option<DistKind>,
    pub pack: Option<bool>,
}

impl Distribution {
    /// Parse `arbitrary`, `plane=N` or `node[:socket[:core]]`, each
    /// optionally followed by `,Pack` or `,NoPack`.
    pub fn parse(s: &str) -> Result<Self, ValueError> {
        let err = || invalid("--distribution", s);

        let (layout, pack) = match s.split_once(',') {
            Some((layout, suffix)) => match suffix.to_ascii_lowercase().as_str() {
                "pack" => (layout, Some(true)),
                "nopack" => (layout, Some(false)),
                _ => return Err(err()),
            },
            None => (s, None),
        };

        let lower = layout.to_ascii_lowercase();
        if lower == "arbitrary" {
            return Ok(Self { node: DistKind::Arbitrary, socket: None, core: None, pack });
        }
        if let Some(size) = lower.strip_prefix("plane=") {
            let size: u32 = size.parse().map_err(|_| err())?;
            if size == 0 {
                return Err(err());
            }
            return Ok(Self { node: DistKind::Plane(size), socket: None, core: None, pack });
        }

        let mut levels = lower.split(':');
        let node = levels.next().and_then(DistKind::parse_level).ok_or_else(err)?;
        let socket = levels.next().map(|l| DistKind::parse_level(l).ok_or_else(err)).transpose()?;
        let core = levels.next().map(|l| DistKind::parse_level(l).ok_or_else(err)).transpose()?;
        if levels.next().is_some() {
            return Err(err());
        }
        Ok(Self { node, socket, core, pack })
    }

    pub fn plane_size(&self) -> Option<u32> {
        match self.node {
            DistKind::Plane(size) => Some(size),
            _ => None,
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node)?;
        if let Some(socket) = self.socket {
            write!(f, ":{}", socket)?;
        }
        if let Some(core) = self.core {
            write!(f, ":{}", core)?;
        }
        match self.pack {
            Some(true) => f.write_str(",Pack"),
            Some(false) => f.write_str(",NoPack"),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Sharing and binding
// ============================================================================

/// Node sharing requested by `--exclusive` / `--oversubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SharedMode {
    Exclusive,
    OverSubscribe,
    User,
    Mcs,
}

impl SharedMode {
    /// Parse the optional `--exclusive` argument; no argument means exclusive.
    pub fn parse_exclusive(arg: Option<&str>) -> Result<Self, ValueError> {
        let Some(arg) = arg else {
            return Ok(Self::Exclusive);
        };
        match arg.to_ascii_lowercase().as_str() {
            "exclusive" => Ok(Self::Exclusive),
            "oversubscribe" => Ok(Self::OverSubscribe),
            "user" => Ok(Self::User),
            "mcs" => Ok(Self::Mcs),
            _ => Err(invalid("--exclusive", arg)),
        }
    }
}

impl fmt::Display for SharedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exclusive => "exclusive",
            Self::OverSubscribe => "oversubscribe",
            Self::User => "user",
            Self::Mcs => "mcs",
        })
    }
}

/// Generic resource binding policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GresBinding {
    DisableBinding,
    EnforceBinding,
}

impl GresBinding {
    pub fn parse(s: &str) -> Result<Self, ValueError> {
        match s.to_ascii_lowercase().as_str() {
            "disable-binding" => Ok(Self::DisableBinding),
            "enforce-binding" => Ok(Self::EnforceBinding),
            _ => Err(invalid("--gres-flags", s)),
        }
    }
}

impl fmt::Display for GresBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DisableBinding => "disable-binding",
            Self::EnforceBinding => "enforce-binding",
        })
    }
}

// ============================================================================
// CPU frequency
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FreqValue {
    Low,
    Medium,
    High,
    HighM1,
    Khz(u32),
}

impl FreqValue {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "highm1" => Some(Self::HighM1),
            other => other.parse().ok().filter(|khz| *khz > 0).map(Self::Khz),
        }
    }
}

impl fmt::Display for FreqValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("Low"),
            Self::Medium => f.write_str("Medium"),
            Self::High => f.write_str("High"),
            Self::HighM1 => f.write_str("HighM1"),
            Self::Khz(khz) => write!(f, "{}", khz),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Governor {
    Conservative,
    OnDemand,
    Performance,
    PowerSave,
    SchedUtil,
    UserSpace,
}

impl Governor {
    const NAMES: &'static [(&'static str, Governor)] = &[
        ("Conservative", Governor::Conservative),
        ("OnDemand", Governor::OnDemand),
        ("Performance", Governor::Performance),
        ("PowerSave", Governor::PowerSave),
        ("SchedUtil", Governor::SchedUtil),
        ("UserSpace", Governor::UserSpace),
    ];

    fn parse(s: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, gov)| *gov)
    }
}

impl fmt::Display for Governor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = Self::NAMES
            .iter()
            .find(|(_, gov)| gov == self)
            .map(|(name, _)| *name)
            .unwrap_or("Unknown");
        f.write_str(name)
    }
}

/// Requested CPU frequency range and governor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CpuFreq {
    pub min: Option<FreqValue>,
    pub max: Option<FreqValue>,
    pub governor: Option<Governor>,
}

impl CpuFreq {
    /// Parse `p1[-p2][:governor]` or a bare governor name.
    pub fn parse(s: &str) -> Result<Self, ValueError> {
        let err = || invalid("--cpu-freq", s);

        if let Some(governor) = Governor::parse(s) {
            return Ok(Self { governor: Some(governor), ..Self::default() });
        }

        let (range, governor) = match s.split_once(':') {
            Some((range, gov)) => (range, Some(Governor::parse(gov).ok_or_else(err)?)),
            None => (s, None),
        };
        let (min, max) = match range.split_once('-') {
            Some((lo, hi)) => (
                Some(FreqValue::parse(lo).ok_or_else(err)?),
                FreqValue::parse(hi).ok_or_else(err)?,
            ),
            None => (None, FreqValue::parse(range).ok_or_else(err)?),
        };
        Ok(Self { min, max: Some(max), governor })
    }

    pub fn is_unset(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.governor.is_none()
    }
}

impl fmt::Display for CpuFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            return f.write_str("unset");
        }
        if let Some(min) = self.min {
            write!(f, "{}-", min)?;
        }
        if let Some(max) = self.max {
            write!(f, "{}", max)?;
        }
        if let Some(gov) = self.governor {
            if self.max.is_some() {
                f.write_str(":")?;
            }
            write!(f, "{}", gov)?;
        }
        Ok(())
    }
}

// ============================================================================
// Memory binding
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemBindKind {
    None,
    Rank,
    Local,
    Map(String),
    Mask(String),
}

/// Memory binding policy for launched tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemBind {
    pub kind: Option<MemBindKind>,
    pub verbose: Option<bool>,
    pub sort: bool,
}

impl MemBind {
    /// The launch default: nothing set except, optionally, sorting.
    pub fn with_sort(sort: bool) -> Self {
        Self { sort, ..Self::default() }
    }

    /// Parse a comma-separated list such as `verbose,map_mem:0,1`.
    pub fn parse(s: &str) -> Result<Self, ValueError> {
        let err = || invalid("--mem-bind", s);
        let mut bind = Self::default();

        // map/mask lists contain commas themselves, so they end the list.
        let mut rest = s;
        while !rest.is_empty() {
            let lower = rest.to_ascii_lowercase();
            if let Some(list) = lower.strip_prefix("map_mem:") {
                bind.kind = Some(MemBindKind::Map(list.to_string()));
                break;
            }
            if let Some(list) = lower.strip_prefix("mask_mem:") {
                bind.kind = Some(MemBindKind::Mask(list.to_string()));
                break;
            }
            let (token, tail) = rest.split_once(',').unwrap_or((rest, ""));
            match token.to_ascii_lowercase().as_str() {
                "q" | "quiet" => bind.verbose = Some(false),
                "v" | "verbose" => bind.verbose = Some(true),
                "sort" => bind.sort = true,
                "no" | "none" => bind.kind = Some(MemBindKind::None),
                "rank" => bind.kind = Some(MemBindKind::Rank),
                "local" => bind.kind = Some(MemBindKind::Local),
                _ => return Err(err()),
            }
            rest = tail;
        }
        Ok(bind)
    }

    pub fn is_unset(&self) -> bool {
        self.kind.is_none() && self.verbose.is_none() && !self.sort
    }
}

impl fmt::Display for MemBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            return f.write_str("unset");
        }
        let mut parts: Vec<String> = Vec::new();
        match self.verbose {
            Some(true) => parts.push("verbose".into()),
            Some(false) => parts.push("quiet".into()),
            None => {}
        }
        if self.sort {
            parts.push("sort".into());
        }
        match &self.kind {
            Some(MemBindKind::None) => parts.push("none".into()),
            Some(MemBindKind::Rank) => parts.push("rank".into()),
            Some(MemBindKind::Local) => parts.push("local".into()),
            Some(MemBindKind::Map(list)) => parts.push(format!("map_mem:{}", list)),
            Some(MemBindKind::Mask(list)) => parts.push(format!("mask_mem:{}", list)),
            None => {}
        }
        f.write_str(&parts.join(","))
    }
}

// ============================================================================
// Topology
// ============================================================================

/// Task placement hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hint {
    ComputeBound,
    MemoryBound,
    Multithread,
    NoMultithread,
}

impl Hint {
    pub fn parse(s: &str) -> Result<Self, ValueError> {
        match s.to_ascii_lowercase().as_str() {
            "compute_bound" => Ok(Self::ComputeBound),
            "memory_bound" => Ok(Self::MemoryBound),
            "multithread" => Ok(Self::Multithread),
            "nomultithread" => Ok(Self::NoMultithread),
            _ => Err(invalid("--hint", s)),
        }
    }

    /// Translate the hint into socket/core/thread limits.
    pub fn apply(self, layout: &mut SocketCoreThread, ntasks_per_core: &mut Option<u32>) {
        match self {
            Self::ComputeBound => {
                layout.sockets = None;
                layout.cores = None;
            }
            Self::MemoryBound => layout.cores = Some(1),
            Self::Multithread => layout.threads = None,
            Self::NoMultithread => {
                layout.threads = Some(1);
                *ntasks_per_core = Some(1);
            }
        }
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ComputeBound => "compute_bound",
            Self::MemoryBound => "memory_bound",
            Self::Multithread => "multithread",
            Self::NoMultithread => "nomultithread",
        })
    }
}

/// Minimum sockets per node, cores per socket and threads per core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SocketCoreThread {
    pub sockets: Option<u32>,
    pub cores: Option<u32>,
    pub threads: Option<u32>,
}

impl SocketCoreThread {
    /// Parse `S[:C[:T]]`; `*` leaves a level unconstrained.
    pub fn parse(s: &str) -> Result<Self, ValueError> {
        let err = || invalid("--extra-node-info", s);
        let mut levels = s.split(':').map(|level| {
            if level == "*" {
                return Ok(None);
            }
            level
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .map(Some)
                .ok_or_else(err)
        });

        let sockets = levels.next().ok_or_else(err)??;
        let cores = levels.next().transpose()?.flatten();
        let threads = levels.next().transpose()?.flatten();
        if levels.next().is_some() {
            return Err(err());
        }
        Ok(Self { sockets, cores, threads })
    }

    /// Parse a single `min[-max]` resource count, keeping the minimum.
    pub fn parse_count(label: &str, s: &str) -> Result<u32, ValueError> {
        let min = s.split_once('-').map(|(lo, _)| lo).unwrap_or(s);
        min.parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| invalid(label, s))
    }

    pub fn is_unset(&self) -> bool {
        self.sockets.is_none() && self.cores.is_none() && self.threads.is_none()
    }
}

impl fmt::Display for SocketCoreThread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            return f.write_str("unset");
        }
        let show = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_else(|| "*".into());
        write!(f, "{}", show(self.sockets))?;
        if self.cores.is_some() || self.threads.is_some() {
            write!(f, ":{}", show(self.cores))?;
        }
        if self.threads.is_some() {
            write!(f, ":{}", show(self.threads))?;
        }
        Ok(())
    }
}

/// Node count request `min[-max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl Default for NodeRange {
    fn default() -> Self {
        Self { min: 1, max: None }
    }
}

impl NodeRange {
    pub fn parse(s: &str) -> Result<Self, ValueError> {
        let err = || invalid("node count", s);
        let count = |v: &str| v.trim().parse::<u32>().map_err(|_| err());
        match s.split_once('-') {
            Some((lo, hi)) => {
                let (min, max) = (count(lo)?, count(hi)?);
                if min > max {
                    return Err(err());
                }
                Ok(Self { min, max: Some(max) })
            }
            None => Ok(Self { min: count(s)?, max: None }),
        }
    }
}

impl fmt::Display for NodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max != self.min => write!(f, "{}-{}", self.min, max),
            _ => write!(f, "{}", self.min),
        }
    }
}

/// Network switch count with an optional maximum wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switches {
    pub count: i32,
    pub wait_secs: Option<u32>,
}

impl Switches {
    /// Parse `count[@max-time]`.
    pub fn parse(s: &str) -> Result<Self, ValueError> {
        let (count, wait) = match s.split_once('@') {
            Some((count, wait)) => (count, Some(super::time_str_to_secs(wait)?)),
            None => (s, None),
        };
        let count = super::parse_int("--switches", count, true)?;
        Ok(Self { count, wait_secs: wait })
    }
}

// ============================================================================
// Miscellaneous
// ============================================================================

/// Validate an accounting frequency list: `N` or `type=N[,type=N...]`.
pub fn parse_acctg_freq(s: &str) -> Result<String, ValueError> {
    const TYPES: &[&str] = &["task", "energy", "network", "filesystem"];
    for item in s.split(',') {
        let value = match item.split_once('=') {
            Some((kind, value)) => {
                if !TYPES.iter().any(|t| t.eq_ignore_ascii_case(kind.trim())) {
                    return Err(invalid("--acctg-freq", s));
                }
                value
            }
            None => item,
        };
        if !matches!(parse_full_int(value), Some(n) if n >= 0) {
            return Err(invalid("--acctg-freq", s));
        }
    }
    Ok(s.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserEnvMode {
    Short,
    Long,
}

/// Login environment retrieval requested by `--get-user-env`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserEnv {
    pub timeout: Option<i32>,
    pub mode: Option<UserEnvMode>,
}

impl UserEnv {
    /// Parse the optional `[timeout][S|L]` argument.
    pub fn parse(arg: Option<&str>) -> Result<Self, ValueError> {
        let Some(arg) = arg else {
            return Ok(Self { timeout: Some(0), mode: None });
        };
        let err = || invalid("--get-user-env", arg);
        let split = arg.find(|c: char| !c.is_ascii_digit()).unwrap_or(arg.len());
        let (digits, suffix) = arg.split_at(split);
        let timeout = if digits.is_empty() { 0 } else { digits.parse().map_err(|_| err())? };
        let mode = match suffix {
            "" => None,
            "s" | "S" => Some(UserEnvMode::Short),
            "l" | "L" => Some(UserEnvMode::Long),
            _ => return Err(err()),
        };
        Ok(Self { timeout: Some(timeout), mode })
    }
}

impl fmt::Display for UserEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.timeout, self.mode) {
            (None, _) => f.write_str("unset"),
            (Some(t), None) => write!(f, "{}", t),
            (Some(t), Some(UserEnvMode::Short)) => write!(f, "{}S", t),
            (Some(t), Some(UserEnvMode::Long)) => write!(f, "{}L", t),
        }
    }
}

/// Terminal bell behavior once an allocation is granted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bell {
    Always,
    #[default]
    AfterDelay,
    Never,
}

impl fmt::Display for Bell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Always => "bell-always",
            Self::AfterDelay => "bell-after-delay",
            Self::Never => "bell-never",
        })
    }
}

/// Job priority request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Priority {
    Top,
    Value(u32),
}

impl Priority {
    /// Largest accepted numeric priority (exclusive).
    pub const LIMIT: u64 = 0xffff_fffe;

    pub fn parse(s: &str) -> Result<Self, ValueError> {
        if s.eq_ignore_ascii_case("top") {
            return Ok(Self::Top);
        }
        match parse_full_int(s) {
            Some(n) if n < 0 => Err(ValueError::new("Priority must be >= 0")),
            Some(n) if n as u64 >= Self::LIMIT => {
                Err(ValueError::new(format!("Priority must be < {}", Self::LIMIT)))
            }
            Some(n) => Ok(Self::Value(n as u32)),
            None => Err(invalid("--priority", s)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("TOP"),
            Self::Value(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mail_type_accumulates_names() {
        let mail = MailType::parse("BEGIN,end").unwrap();
        assert!(mail.contains(MailType::BEGIN));
        assert!(mail.contains(MailType::END));
        assert!(!mail.contains(MailType::FAIL));
        assert_eq!(mail.to_string(), "BEGIN,END");
        assert!(MailType::parse("SOMETIMES").is_err());
    }

    #[test]
    fn distribution_levels() {
        let dist = Distribution::parse("block:cyclic,Pack").unwrap();
        assert_eq!(dist.node, DistKind::Block);
        assert_eq!(dist.socket, Some(DistKind::Cyclic));
        assert_eq!(dist.pack, Some(true));
        assert_eq!(dist.to_string(), "block:cyclic,Pack");

        assert_eq!(Distribution::parse("plane=4").unwrap().plane_size(), Some(4));
        assert!(Distribution::parse("plane=0").is_err());
        assert!(Distribution::parse("diagonal").is_err());
    }

    #[test]
    fn cpu_freq_forms() {
        let gov = CpuFreq::parse("performance").unwrap();
        assert_eq!(gov.governor, Some(Governor::Performance));

        let range = CpuFreq::parse("low-high:OnDemand").unwrap();
        assert_eq!(range.min, Some(FreqValue::Low));
        assert_eq!(range.max, Some(FreqValue::High));
        assert_eq!(range.to_string(), "Low-High:OnDemand");

        assert!(CpuFreq::parse("fast").is_err());
    }

    #[test]
    fn mem_bind_lists() {
        let bind = MemBind::parse("verbose,map_mem:0,1").unwrap();
        assert_eq!(bind.verbose, Some(true));
        assert_eq!(bind.kind, Some(MemBindKind::Map("0,1".into())));
        assert_eq!(bind.to_string(), "verbose,map_mem:0,1");
        assert!(MemBind::parse("sideways").is_err());
        assert_eq!(MemBind::with_sort(true).to_string(), "sort");
    }

    #[test]
    fn socket_core_thread_wildcards() {
        let sct = SocketCoreThread::parse("2:*:1").unwrap();
        assert_eq!(sct.sockets, Some(2));
        assert_eq!(sct.cores, None);
        assert_eq!(sct.threads, Some(1));
        assert_eq!(sct.to_string(), "2:*:1");
        assert!(SocketCoreThread::parse("0").is_err());
    }

    #[test]
    fn node_range() {
        assert_eq!(NodeRange::parse("2-4").unwrap(), NodeRange { min: 2, max: Some(4) });
        assert!(NodeRange::parse("4-2").is_err());
        assert!(NodeRange::parse("many").is_err());
    }

    #[test]
    fn user_env_suffixes() {
        assert_eq!(UserEnv::parse(None).unwrap().to_string(), "0");
        assert_eq!(UserEnv::parse(Some("10L")).unwrap().to_string(), "10L");
        assert_eq!(UserEnv::parse(Some("S")).unwrap().to_string(), "0S");
        assert!(UserEnv::parse(Some("10X")).is_err());
    }

    #[test]
    fn priority_bounds() {
        assert_eq!(Priority::parse("top"), Ok(Priority::Top));
        assert_eq!(Priority::parse("42"), Ok(Priority::Value(42)));
        assert!(Priority::parse("-1").is_err());
        assert!(Priority::parse("4294967294").is_err());
    }

    #[test]
    fn acctg_freq_validation() {
        assert!(parse_acctg_freq("30").is_ok());
        assert!(parse_acctg_freq("task=30,energy=0").is_ok());
        assert!(parse_acctg_freq("disk=30").is_err());
        assert!(parse_acctg_freq("task=soon").is_err());
    }
}
