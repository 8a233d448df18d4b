//! Groovy sources pushed through the Script API.
//!
//! These cover the two administrative knobs the REST API does not expose:
//! the server's base URL capability and scheduled task management. Scripts
//! receive their arguments as a JSON string in `args`.

use serde_json::{Value, json};

pub const SETUP_BASE_URL_NAME: &str = "setup_base_url";

pub const SETUP_BASE_URL: &str = r#"import groovy.json.JsonSlurper

parsedArgs = new JsonSlurper().parseText(args)

core.baseUrl(parsedArgs.baseUrl)
"#;

pub const CREATE_TASK_NAME: &str = "create_task";

pub const CREATE_TASK: &str = r#"import groovy.json.JsonSlurper
import org.sonatype.nexus.scheduling.TaskConfiguration
import org.sonatype.nexus.scheduling.TaskInfo
import org.sonatype.nexus.scheduling.TaskScheduler
import org.sonatype.nexus.scheduling.schedule.Schedule

parsedArgs = new JsonSlurper().parseText(args)

TaskScheduler taskScheduler = container.lookup(TaskScheduler.class.getName())

TaskInfo existingTask = taskScheduler.listsTasks().find { TaskInfo taskInfo ->
    taskInfo.name == parsedArgs.name
}

if (existingTask && existingTask.getCurrentState().getRunState() != null) {
    log.info("Could not update currently running task : " + parsedArgs.name)
    return
}

TaskConfiguration taskConfiguration = taskScheduler.createTaskConfigurationInstance(parsedArgs.typeId)
if (existingTask) { taskConfiguration.setId(existingTask.getId()) }
taskConfiguration.setName(parsedArgs.name)

parsedArgs.taskProperties.each { key, value -> taskConfiguration.setString(key, value) }

if (parsedArgs.setAlertEmail) {
    taskConfiguration.setAlertEmail(parsedArgs.setAlertEmail)
}

parsedArgs.booleanTaskProperties.each { key, value -> taskConfiguration.setBoolean(key, Boolean.valueOf(value)) }

Schedule schedule = taskScheduler.scheduleFactory.cron(new Date(), parsedArgs.cron)

taskScheduler.scheduleTask(taskConfiguration, schedule)
"#;

pub fn base_url_args(base_url: &str) -> Value {
    json!({ "baseUrl": base_url })
}

pub fn task_args(
    name: &str,
    type_id: &str,
    properties: &Value,
    cron: &str,
    alert_email: Option<&str>,
) -> Value {
    json!({
        "name": name,
        "typeId": type_id,
        "taskProperties": properties,
        "booleanTaskProperties": {},
        "setAlertEmail": alert_email,
        "cron": cron,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_args_carry_the_scheduler_fields() {
        let args = task_args(
            "database_backup",
            "db.backup",
            &json!({"location": "/nexus-data/backup"}),
            "0 0 21 * * ?",
            None,
        );
        assert_eq!(args["typeId"], "db.backup");
        assert_eq!(args["taskProperties"]["location"], "/nexus-data/backup");
        assert_eq!(args["cron"], "0 0 21 * * ?");
        assert_eq!(args["setAlertEmail"], Value::Null);
    }
}
