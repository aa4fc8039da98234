pub struct Icons;

impl Icons {
    pub const QR: &str = "🔳";
    pub const CAMERA: &str = "📷";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const LINK: &str = "🔗";
    pub const TEXT: &str = "📝";
    pub const DEL: &str = "🗑️";
    pub const FOLDER: &str = "📁";
    pub const PENCIL: &str = "✏️";
}
