mod installation;

pub use installation::InstallationRepository;
