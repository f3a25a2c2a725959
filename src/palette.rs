/// Display colours for cluster indices; index `i` always maps to the same colour.
const PALETTE: [&str; 10] = [
    "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD", "#8C564B", "#E377C2", "#7F7F7F",
    "#BCBD22", "#17BECF",
];

/// Hex colour for a cluster index. Cycles when k exceeds the palette.
pub fn color_for(cluster: usize) -> &'static str {
    PALETTE[cluster % PALETTE.len()]
}
