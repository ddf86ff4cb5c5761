use std::sync::Arc;

use stackplan::{
    create_event_channel, parse_descriptors, DeploymentRunner, DescriptorFormat, EngineEvent,
    FileStateStore, StaticProvisioner,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== stackplan — declarative deployment demo ===\n");

    // A CI deployment: container cluster with a shared filesystem behind a
    // load balancer.
    let yaml = r#"
name: jenkins
resources:
  - id: network
    kind: network
    properties:
      cidr: 10.0.0.0/16
      max_azs: 2
  - id: cluster
    kind: cluster
    depends_on: [network]
    properties:
      name: jenkins-cluster
  - id: jenkins-home
    kind: file-system
    depends_on: [network]
    properties:
      encrypted: true
      access_point: /jenkins-home
  - id: task
    kind: task-definition
    depends_on: [jenkins-home]
    properties:
      image: jenkins/jenkins:lts
      cpu: 1024
      memory_mib: 2048
      mount_path: /var/jenkins_home
  - id: load-balancer
    kind: load-balancer
    depends_on: [network]
    properties:
      internet_facing: true
      port: 80
  - id: service
    kind: service
    depends_on: [cluster, task, load-balancer]
    properties:
      desired_count: 1
      health_check_grace_secs: 300
"#;

    let schema = parse_descriptors(yaml, DescriptorFormat::Yaml).expect("failed to parse descriptors");
    println!("[OK] descriptors parsed ({} resources)", schema.resources.len());

    let state_store = Arc::new(
        FileStateStore::new(".stackplan-state").expect("failed to open state directory"),
    );
    let (events, mut event_rx) = create_event_channel();

    let runner = DeploymentRunner::from_schema(schema)
        .provisioner(Arc::new(StaticProvisioner))
        .state_store(state_store)
        .events(events)
        .build()
        .expect("invalid deployment graph");

    let plan = runner.plan().expect("planning failed");
    println!("[OK] apply plan: {}", plan.node_ids.join(" -> "));

    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                EngineEvent::NodeStarted { node_id, .. } => {
                    println!("  .. provisioning {node_id}");
                }
                EngineEvent::NodeSucceeded { node_id, .. } => {
                    println!("  ok {node_id}");
                }
                EngineEvent::NodeFailed { node_id, error, .. } => {
                    println!("  FAILED {node_id}: {error}");
                }
                EngineEvent::NodeSkipped {
                    node_id, reason, ..
                } => {
                    println!("  skip {node_id} ({reason:?})");
                }
                _ => {}
            }
        }
    });

    let report = runner.apply().await.expect("apply run failed");
    drop(runner);
    let _ = printer.await;

    println!(
        "\n[DONE] run {}: {} succeeded, {} skipped, {} failed",
        report.run_id,
        report.succeeded_nodes().len(),
        report.skipped_nodes().len(),
        report.failed_nodes().len(),
    );
}
