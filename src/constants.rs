// src/constants.rs

pub const UI_WIDTH: usize = 72;
pub const FILENAME_TRUNCATE_LENGTH: usize = 50;
pub const MAX_FILENAME_BYTES: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = "dbroulette.log";
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const CACHE_DIR_NAME: &str = clap::crate_name!();
pub const TOKEN_ENV_VAR: &str = "DROPBOX_ACCESS_TOKEN";
pub const USER_AGENT: &str = concat!(clap::crate_name!(), "/", clap::crate_version!());

pub const DEFAULT_API_BASE: &str = "https://api.dropbox.com/1";
pub const DEFAULT_CONTENT_BASE: &str = "https://api-content.dropbox.com/1";
pub const DEFAULT_ROOT: &str = "auto";
pub const DEFAULT_FOLDER: &str = "/";
/// 单次元数据请求最多返回的目录项
pub const METADATA_FILE_LIMIT: u32 = 1000;

pub const HELP_TOKEN_GUIDE: &str = r#"
1. 登录 Dropbox 开发者控制台: https://www.dropbox.com/developers/apps
2. 选择 (或新建) 一个应用，进入 "Settings" 页面。
3. 在 "OAuth 2" 区域点击 "Generate access token"。
4. 复制生成的 Token，然后任选一种方式提供给本程序:
   - 命令行参数: --token <TOKEN>
   - 环境变量:   DROPBOX_ACCESS_TOKEN=<TOKEN>
   - 运行 --login 将 Token 保存到本地配置文件"#;
