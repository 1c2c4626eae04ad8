/// Core modules shipped with the runtime.
const BUILTIN_MODULES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Whether `name` refers to a core module (`fs`, `fs/promises`, `node:test`, ...).
pub fn is_builtin(name: &str) -> bool {
    if name.starts_with("node:") {
        return true;
    }
    let root = name.split('/').next().unwrap_or(name);
    BUILTIN_MODULES.contains(&root)
}
