use anyhow::Result;
use clap::Args;
use foundation::Role;

use crate::config::ClusterArgs;

/// Show how the matrix rows are split across cores
#[derive(Args, Debug)]
pub struct PartitionArgs {
    #[command(flatten)]
    pub cluster: ClusterArgs,
}

pub fn run(args: PartitionArgs) -> Result<()> {
    let settings = args.cluster.resolve()?;
    let cluster = settings.cluster;

    println!(
        "{}x{} matrix over {} cores ({} rows each)",
        cluster.mat_size(),
        cluster.mat_size(),
        cluster.core_count(),
        cluster.rows_per_core()
    );
    for id in cluster.cores() {
        let core = cluster.core(id)?;
        let role = match core.role() {
            Role::Coordinator => "coordinator",
            Role::Peer => "peer",
        };
        let rows = core.row_range();
        println!("core {id:>3}  {role:<11}  rows {:?}", rows.rows());
    }
    Ok(())
}
