//! CPU topology discovery.
//!
//! On Linux the socket and core identity of every logical CPU is read from
//! sysfs. Other targets report no topology, which callers treat as
//! "unknown" and fall back to the online CPU count.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

use tracing::debug;

/// Upper bound on the logical CPU indices probed.
pub const MAX_CPUS: usize = 1024;

pub const SYSFS_CPU_ROOT: &str = "/sys/devices/system/cpu";

/// A physical core. `core` is only unique within its socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoreKey {
    pub socket: u32,
    pub core: u32,
}

/// Physical core to the logical CPUs sharing it, in discovery order.
pub type TopologyMap = BTreeMap<CoreKey, Vec<usize>>;

/// Reads per-CPU topology attributes from a sysfs-shaped directory tree.
#[derive(Debug, Clone)]
pub struct SysfsReader {
    root: PathBuf,
    configured: usize,
}

impl SysfsReader {
    pub fn new(root: impl Into<PathBuf>, configured: usize) -> Self {
        SysfsReader {
            root: root.into(),
            configured,
        }
    }

    pub fn system() -> Self {
        SysfsReader::new(SYSFS_CPU_ROOT, num_logical_cpus_configured())
    }

    fn read_id(&self, cpu: usize, attribute: &str) -> Option<u32> {
        let path = self
            .root
            .join(format!("cpu{}", cpu))
            .join("topology")
            .join(attribute);
        fs::read_to_string(path).ok()?.trim().parse().ok()
    }

    fn core_key(&self, cpu: usize) -> Option<CoreKey> {
        let socket = self.read_id(cpu, "physical_package_id")?;
        let core = self.read_id(cpu, "core_id")?;
        Some(CoreKey { socket, core })
    }

    /// Every readable logical CPU with its core key. Unreadable CPUs are skipped.
    fn entries(&self) -> impl Iterator<Item = (usize, CoreKey)> + '_ {
        (0..self.configured.min(MAX_CPUS))
            .filter_map(move |cpu| self.core_key(cpu).map(|key| (cpu, key)))
    }

    /// Distinct sockets, or `None` when no CPU could be read.
    pub fn num_sockets(&self) -> Option<usize> {
        let sockets: BTreeSet<u32> = self.entries().map(|(_, key)| key.socket).collect();
        non_empty(sockets.len())
    }

    /// Distinct (socket, core) pairs, or `None` when no CPU could be read.
    pub fn num_physical_cores(&self) -> Option<usize> {
        let cores: BTreeSet<CoreKey> = self.entries().map(|(_, key)| key).collect();
        non_empty(cores.len())
    }

    /// Empty when nothing could be read.
    pub fn build_topology_map(&self) -> TopologyMap {
        let mut map = TopologyMap::new();
        for (cpu, key) in self.entries() {
            map.entry(key).or_default().push(cpu);
        }
        map
    }
}

fn non_empty(count: usize) -> Option<usize> {
    (count > 0).then_some(count)
}

#[cfg(unix)]
mod os {
    fn sysconf_count(name: libc::c_int) -> Option<usize> {
        let count = unsafe { libc::sysconf(name) };
        usize::try_from(count).ok().filter(|&n| n > 0)
    }

    pub fn configured() -> Option<usize> {
        sysconf_count(libc::_SC_NPROCESSORS_CONF)
    }

    pub fn online() -> Option<usize> {
        sysconf_count(libc::_SC_NPROCESSORS_ONLN)
    }
}

#[cfg(not(unix))]
mod os {
    pub fn configured() -> Option<usize> {
        None
    }

    pub fn online() -> Option<usize> {
        None
    }
}

fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Logical CPUs the OS has configured, online or not.
pub fn num_logical_cpus_configured() -> usize {
    os::configured().unwrap_or_else(available_parallelism)
}

pub fn num_logical_cpus_online() -> usize {
    os::online().unwrap_or_else(available_parallelism)
}

/// A one-shot snapshot of the machine's topology, cached for the process.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    sockets: Option<usize>,
    physical_cores: Option<usize>,
    logical_configured: usize,
    logical_online: usize,
    map: TopologyMap,
}

impl Topology {
    pub fn discover() -> Self {
        let topology = if cfg!(target_os = "linux") {
            Topology::from_reader(&SysfsReader::system(), num_logical_cpus_online())
        } else {
            Topology::unknown(num_logical_cpus_configured(), num_logical_cpus_online())
        };

        debug!(
            sockets = ?topology.sockets,
            physical_cores = ?topology.physical_cores,
            online = topology.logical_online,
            "discovered CPU topology"
        );
        topology
    }

    pub fn from_reader(reader: &SysfsReader, logical_online: usize) -> Self {
        let map = reader.build_topology_map();
        let sockets: BTreeSet<u32> = map.keys().map(|key| key.socket).collect();
        Topology {
            sockets: non_empty(sockets.len()),
            physical_cores: non_empty(map.len()),
            logical_configured: reader.configured,
            logical_online,
            map,
        }
    }

    /// No socket or core information, only CPU counts.
    pub fn unknown(logical_configured: usize, logical_online: usize) -> Self {
        Topology {
            sockets: None,
            physical_cores: None,
            logical_configured,
            logical_online,
            map: TopologyMap::new(),
        }
    }

    pub fn num_sockets(&self) -> Option<usize> {
        self.sockets
    }

    pub fn num_physical_cores(&self) -> Option<usize> {
        self.physical_cores
    }

    pub fn num_logical_cpus_configured(&self) -> usize {
        self.logical_configured
    }

    pub fn num_logical_cpus_online(&self) -> usize {
        self.logical_online
    }

    pub fn map(&self) -> &TopologyMap {
        &self.map
    }

    pub fn is_known(&self) -> bool {
        !self.map.is_empty()
    }

    /// Unknown topology never reports hyperthreading.
    pub fn is_hyperthreading_enabled(&self) -> bool {
        self.physical_cores
            .is_some_and(|cores| self.logical_online > cores)
    }

    /// Cores the harness may spread work over: online CPUs capped by physical
    /// cores, or the online count alone when the topology is unknown.
    pub fn cores_to_use(&self) -> usize {
        match self.physical_cores {
            Some(cores) => cores.min(self.logical_online),
            None => self.logical_online,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "CPU sockets: {}, physical cores: {}, available cores: {}, cores to use: {}, hyperthreading enabled: {}",
            display_count(self.sockets),
            display_count(self.physical_cores),
            self.logical_online,
            self.cores_to_use(),
            self.is_hyperthreading_enabled()
        )
    }

    /// One line per physical core, e.g. `Socket 0, Core 3: Logical CPUs [3, 11]`.
    pub fn mapping_lines(&self) -> Vec<String> {
        self.map
            .iter()
            .map(|(key, cpus)| {
                let cpus: Vec<String> = cpus.iter().map(|cpu| cpu.to_string()).collect();
                format!(
                    "Socket {}, Core {}: Logical CPUs [{}]",
                    key.socket,
                    key.core,
                    cpus.join(", ")
                )
            })
            .collect()
    }

    pub fn print_mapping(&self) {
        if self.map.is_empty() {
            eprintln!("Unable to determine physical core mapping.");
            return;
        }
        println!("Physical Core to Logical CPU Mapping:");
        println!("====================================");
        for line in self.mapping_lines() {
            println!("{}", line);
        }
    }
}

fn display_count(count: Option<usize>) -> String {
    count.map_or_else(|| "unknown".to_string(), |n| n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_cpu(root: &Path, cpu: usize, socket: Option<&str>, core: Option<&str>) {
        let dir = root.join(format!("cpu{}", cpu)).join("topology");
        fs::create_dir_all(&dir).unwrap();
        if let Some(socket) = socket {
            fs::write(dir.join("physical_package_id"), format!("{}\n", socket)).unwrap();
        }
        if let Some(core) = core {
            fs::write(dir.join("core_id"), format!("{}\n", core)).unwrap();
        }
    }

    /// Two sockets, two cores each, two hardware threads per core. Siblings
    /// are numbered `n` and `n + 4` as Linux usually does.
    fn dual_socket_ht() -> TempDir {
        let dir = TempDir::new().unwrap();
        let layout = [(0, 0), (0, 1), (1, 0), (1, 1)];
        for (cpu, (socket, core)) in layout.iter().enumerate() {
            let (socket, core) = (socket.to_string(), core.to_string());
            write_cpu(dir.path(), cpu, Some(&socket), Some(&core));
            write_cpu(dir.path(), cpu + 4, Some(&socket), Some(&core));
        }
        dir
    }

    #[test]
    fn counts_sockets_and_cores() {
        let dir = dual_socket_ht();
        let reader = SysfsReader::new(dir.path(), 8);
        assert_eq!(reader.num_sockets(), Some(2));
        assert_eq!(reader.num_physical_cores(), Some(4));
    }

    #[test]
    fn core_id_is_scoped_to_socket() {
        let dir = dual_socket_ht();
        let map = SysfsReader::new(dir.path(), 8).build_topology_map();
        assert_eq!(map.len(), 4);
        assert_eq!(map[&CoreKey { socket: 0, core: 0 }], vec![0, 4]);
        assert_eq!(map[&CoreKey { socket: 1, core: 0 }], vec![2, 6]);
    }

    #[test]
    fn unreadable_cpus_are_skipped() {
        let dir = TempDir::new().unwrap();
        write_cpu(dir.path(), 0, Some("0"), Some("0"));
        write_cpu(dir.path(), 1, Some("0"), None);
        write_cpu(dir.path(), 2, Some("garbage"), Some("1"));
        write_cpu(dir.path(), 3, Some("0"), Some("3"));

        let reader = SysfsReader::new(dir.path(), 5);
        let map = reader.build_topology_map();
        let cpus: Vec<usize> = map.values().flatten().copied().collect();
        assert_eq!(cpus, vec![0, 3]);
        assert_eq!(reader.num_physical_cores(), Some(2));
    }

    #[test]
    fn empty_tree_is_unknown() {
        let dir = TempDir::new().unwrap();
        let reader = SysfsReader::new(dir.path(), 16);
        assert_eq!(reader.num_sockets(), None);
        assert_eq!(reader.num_physical_cores(), None);
        assert!(reader.build_topology_map().is_empty());

        let topology = Topology::from_reader(&reader, 16);
        assert!(!topology.is_known());
        assert!(!topology.is_hyperthreading_enabled());
        assert_eq!(topology.cores_to_use(), 16);
    }

    #[test]
    fn probing_stops_at_configured_count() {
        let dir = dual_socket_ht();
        let reader = SysfsReader::new(dir.path(), 4);
        let map = reader.build_topology_map();
        assert!(map.values().all(|cpus| cpus.len() == 1));
    }

    #[test]
    fn hyperthreading_and_cores_to_use() {
        let dir = dual_socket_ht();
        let topology = Topology::from_reader(&SysfsReader::new(dir.path(), 8), 8);
        assert!(topology.is_hyperthreading_enabled());
        assert_eq!(topology.cores_to_use(), 4);

        let no_smt = Topology::from_reader(&SysfsReader::new(dir.path(), 4), 4);
        assert!(!no_smt.is_hyperthreading_enabled());
    }

    #[test]
    fn mapping_lines_list_siblings() {
        let dir = dual_socket_ht();
        let topology = Topology::from_reader(&SysfsReader::new(dir.path(), 8), 8);
        let lines = topology.mapping_lines();
        assert_eq!(lines[0], "Socket 0, Core 0: Logical CPUs [0, 4]");
        assert_eq!(lines[3], "Socket 1, Core 1: Logical CPUs [3, 7]");
    }

    #[test]
    fn discovery_is_repeatable() {
        assert_eq!(Topology::discover(), Topology::discover());
    }
}
