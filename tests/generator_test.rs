use std::sync::Arc;
use std::thread;

use cmdgen::prelude::*;
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq)]
struct Person {
    id: i64,
    name: String,
    age: Option<i32>,
}

impl Entity for Person {
    fn table_info() -> CmdGenResult<TableInfo<Self>> {
        TableInfo::builder("Person")
            .key("Id", |p: &Person| p.id.into())
            .column("Name", |p: &Person| p.name.as_str().into())
            .column("Age", |p: &Person| p.age.into())
            .build()
    }
}

struct OrderLine {
    order_id: i64,
    line_no: i32,
    qty: i32,
}

impl Entity for OrderLine {
    fn table_info() -> CmdGenResult<TableInfo<Self>> {
        TableInfo::builder("OrderLine")
            .key("OrderId", |l: &OrderLine| l.order_id.into())
            .key("LineNo", |l: &OrderLine| l.line_no.into())
            .column("Qty", |l: &OrderLine| l.qty.into())
            .build()
    }
}

fn ann() -> Person {
    Person {
        id: 1,
        name: "Ann".to_string(),
        age: Some(31),
    }
}

#[test]
fn test_person_scenario() {
    let generator = TableCommandGenerator::<Person>::for_entity().unwrap();

    let insert = generator.insert_command();
    assert_eq!(
        insert.sql(),
        "INSERT INTO Person (Id, Name, Age) VALUES (@Id, @Name, @Age)"
    );
    assert_eq!(insert.parameters().len(), generator.query_columns().len());

    let delete = generator.delete_command().unwrap();
    assert_eq!(delete.sql(), "DELETE FROM Person WHERE Id = @Id");

    let commands: Vec<Command> = generator.delete_commands([1, 2]).unwrap().collect();
    let bound: Vec<(String, Option<Value>)> = commands
        .iter()
        .flat_map(|c| c.parameters().iter().map(|p| (p.name.clone(), p.value.clone())))
        .collect();
    assert_eq!(
        bound,
        vec![
            ("Id".to_string(), Some(Value::Int(1))),
            ("Id".to_string(), Some(Value::Int(2))),
        ]
    );
}

#[test]
fn test_order_line_scenario() {
    let generator = TableCommandGenerator::<OrderLine>::for_entity().unwrap();

    let err = generator.delete_commands([1, 2]).err().unwrap();
    assert!(matches!(err, CmdGenError::CompositePrimaryKey { .. }));

    let update = generator.update_command().unwrap();
    assert!(
        update
            .sql()
            .ends_with("WHERE OrderId = @OrderId AND LineNo = @LineNo")
    );
    // non-key columns + key columns
    assert_eq!(update.parameters().len(), 3);

    let line = OrderLine {
        order_id: 10,
        line_no: 2,
        qty: 5,
    };
    let mut update = update;
    generator.fill(&mut update, &line).unwrap();
    assert_eq!(
        update.to_literal_sql(),
        "UPDATE OrderLine SET Qty = 5 WHERE OrderId = 10 AND LineNo = 2"
    );
}

#[test]
fn test_insert_round_trip() {
    let generator = TableCommandGenerator::<Person>::for_entity().unwrap();
    let person = ann();

    let mut insert = generator.insert_command();
    generator.fill(&mut insert, &person).unwrap();

    for column in generator.query_columns() {
        let filled = insert
            .parameter(&column.parameter_name())
            .and_then(|p| p.value.clone());
        assert_eq!(filled, Some(generator.column_value(column, &person).unwrap()));
    }
}

#[test]
fn test_fill_replaces_previous_values() {
    let generator = TableCommandGenerator::<Person>::for_entity().unwrap();
    let mut update = generator.update_command().unwrap();

    generator.fill(&mut update, &ann()).unwrap();
    let bob = Person {
        id: 2,
        name: "Bob".to_string(),
        age: None,
    };
    generator.fill(&mut update, &bob).unwrap();

    assert_eq!(
        update.to_literal_sql(),
        "UPDATE Person SET Name = 'Bob', Age = NULL WHERE Id = 2"
    );
}

#[test]
fn test_delete_where_then_fill() {
    let generator = TableCommandGenerator::<Person>::for_entity().unwrap();
    let expr = WhereExpression::new("Age > @1 OR Id = @Id", [Value::from(60), Value::from(0)]).unwrap();
    let mut delete = generator.delete_command_where(&expr).unwrap();

    assert_eq!(delete.sql(), "DELETE FROM Person WHERE Age > @1 OR Id = @Id");

    // Only the parameter named after a column is overwritten.
    generator.fill(&mut delete, &ann()).unwrap();
    assert_eq!(delete.parameter("1").unwrap().value, Some(Value::Int(60)));
    assert_eq!(delete.parameter("Id").unwrap().value, Some(Value::Int(1)));
}

#[test]
fn test_shared_between_threads() {
    let generator = Arc::new(TableCommandGenerator::<Person>::for_entity().unwrap());

    let handles: Vec<_> = (0..4i64)
        .map(|i| {
            let generator = Arc::clone(&generator);
            thread::spawn(move || {
                let person = Person {
                    id: i,
                    name: format!("p{}", i),
                    age: None,
                };
                let mut cmd = generator.update_command().unwrap();
                generator.fill(&mut cmd, &person).unwrap();
                cmd.parameter("Id").unwrap().value.clone()
            })
        })
        .collect();

    let ids: Vec<Option<Value>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        ids,
        (0..4).map(|i| Some(Value::Int(i))).collect::<Vec<_>>()
    );
}

#[test]
fn test_query_columns_stable() {
    let generator = TableCommandGenerator::<Person>::for_entity().unwrap();
    let first: Vec<&str> = generator.query_columns().iter().map(|c| c.name()).collect();
    let second: Vec<&str> = generator.query_columns().iter().map(|c| c.name()).collect();
    assert_eq!(first, vec!["Id", "Name", "Age"]);
    assert_eq!(first, second);
}
