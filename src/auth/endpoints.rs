/// URL endpoints of a FileCloud server's `core` API, all derived from the
/// server base URL.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub login: String,
    pub search: String,
    pub file_exists: String,
    pub create_folder: String,
    pub rename_or_move: String,
    pub delete_file: String,
}

impl Endpoints {
    /// Build the endpoint set for `server_url` (with or without a trailing `/`).
    pub fn for_server(server_url: &str) -> Self {
        let base = server_url.trim_end_matches('/');
        let core = |name: &str| format!("{}/core/{}", base, name);
        Self {
            login: core("loginguest"),
            search: core("search"),
            file_exists: core("fileexists"),
            create_folder: core("createfolder"),
            rename_or_move: core("renameormove"),
            delete_file: core("deletefile"),
        }
    }
}
