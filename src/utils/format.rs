const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Human-readable size label: bytes below 1 KiB, then one decimal place in KB or MB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < KIB {
        return format!("{} B", bytes);
    }
    if bytes < MIB {
        return format!("{:.1} KB", bytes as f64 / KIB as f64);
    }
    format!("{:.1} MB", bytes as f64 / MIB as f64)
}
