//! Built-in artifact templates.
//!
//! One template per [`ArtifactKind`], compiled into the binary. The target is
//! a Spring Boot application built with Maven: JPA entity, Spring Data
//! repository, service, REST controller, bootstrap class, properties,
//! `pom.xml` and a schema script.
//!
//! Templates only use placeholders bound by
//! [`RenderContext::for_request`](entigen_core::domain::RenderContext::for_request);
//! the tests below enforce that.

use entigen_core::domain::ArtifactKind;

const MODEL: &str = r#"package {{NAMESPACE}}.model;

import jakarta.persistence.Entity;
import jakarta.persistence.GeneratedValue;
import jakarta.persistence.GenerationType;
import jakarta.persistence.Id;
import jakarta.persistence.Table;
{{IMPORTS}}
@Entity
@Table(name = "\"{{TABLE_NAME}}\"")
public class {{CLASS_NAME}} {

{{FIELD_DECLARATIONS}}
    public {{CLASS_NAME}}() {
    }

    public {{CLASS_NAME}}({{CONSTRUCTOR_PARAMS}}) {
{{CONSTRUCTOR_ASSIGNMENTS}}    }

{{ACCESSORS}}}
"#;

const REPOSITORY: &str = r#"package {{NAMESPACE}}.repository;

import org.springframework.data.jpa.repository.JpaRepository;
import org.springframework.stereotype.Repository;

import {{NAMESPACE}}.model.{{CLASS_NAME}};

@Repository
public interface {{CLASS_NAME}}Repository extends JpaRepository<{{CLASS_NAME}}, {{PK_TYPE}}> {
}
"#;

const SERVICE: &str = r#"package {{NAMESPACE}}.service;

import java.util.List;
import java.util.Optional;

import org.springframework.stereotype.Service;

import {{NAMESPACE}}.model.{{CLASS_NAME}};
import {{NAMESPACE}}.repository.{{CLASS_NAME}}Repository;

@Service
public class {{CLASS_NAME}}Service {

    private final {{CLASS_NAME}}Repository repository;

    public {{CLASS_NAME}}Service({{CLASS_NAME}}Repository repository) {
        this.repository = repository;
    }

    public List<{{CLASS_NAME}}> findAll() {
        return repository.findAll();
    }

    public Optional<{{CLASS_NAME}}> findById({{PK_TYPE}} id) {
        return repository.findById(id);
    }

    public {{CLASS_NAME}} save({{CLASS_NAME}} {{CLASS_VAR}}) {
        return repository.save({{CLASS_VAR}});
    }

    public Optional<{{CLASS_NAME}}> update({{PK_TYPE}} id, {{CLASS_NAME}} changes) {
        return repository.findById(id).map(existing -> {
{{UPDATE_ASSIGNMENTS}}            return repository.save(existing);
        });
    }

    public boolean deleteById({{PK_TYPE}} id) {
        if (!repository.existsById(id)) {
            return false;
        }
        repository.deleteById(id);
        return true;
    }
}
"#;

const CONTROLLER: &str = r#"package {{NAMESPACE}}.controller;

import java.util.List;

import org.springframework.http.ResponseEntity;
import org.springframework.web.bind.annotation.DeleteMapping;
import org.springframework.web.bind.annotation.GetMapping;
import org.springframework.web.bind.annotation.PathVariable;
import org.springframework.web.bind.annotation.PostMapping;
import org.springframework.web.bind.annotation.PutMapping;
import org.springframework.web.bind.annotation.RequestBody;
import org.springframework.web.bind.annotation.RequestMapping;
import org.springframework.web.bind.annotation.RestController;

import {{NAMESPACE}}.model.{{CLASS_NAME}};
import {{NAMESPACE}}.service.{{CLASS_NAME}}Service;

@RestController
@RequestMapping("/api/{{TABLE_NAME}}")
public class {{CLASS_NAME}}Controller {

    private final {{CLASS_NAME}}Service service;

    public {{CLASS_NAME}}Controller({{CLASS_NAME}}Service service) {
        this.service = service;
    }

    @GetMapping
    public List<{{CLASS_NAME}}> list() {
        return service.findAll();
    }

    @GetMapping("/{id}")
    public ResponseEntity<{{CLASS_NAME}}> get(@PathVariable {{PK_TYPE}} id) {
        return service.findById(id)
                .map(ResponseEntity::ok)
                .orElse(ResponseEntity.notFound().build());
    }

    @PostMapping
    public {{CLASS_NAME}} create(@RequestBody {{CLASS_NAME}} {{CLASS_VAR}}) {
        return service.save({{CLASS_VAR}});
    }

    @PutMapping("/{id}")
    public ResponseEntity<{{CLASS_NAME}}> update(@PathVariable {{PK_TYPE}} id, @RequestBody {{CLASS_NAME}} changes) {
        return service.update(id, changes)
                .map(ResponseEntity::ok)
                .orElse(ResponseEntity.notFound().build());
    }

    @DeleteMapping("/{id}")
    public ResponseEntity<Void> delete(@PathVariable {{PK_TYPE}} id) {
        return service.deleteById(id)
                ? ResponseEntity.noContent().build()
                : ResponseEntity.notFound().build();
    }
}
"#;

const APPLICATION: &str = r#"package {{NAMESPACE}};

import org.springframework.boot.SpringApplication;
import org.springframework.boot.autoconfigure.SpringBootApplication;

@SpringBootApplication
public class Application {

    public static void main(String[] args) {
        SpringApplication.run(Application.class, args);
    }
}
"#;

const PROPERTIES: &str = r#"spring.application.name={{ARTIFACT_ID}}
server.port=8080

spring.datasource.url=jdbc:h2:mem:{{ARTIFACT_ID}}
spring.datasource.driver-class-name=org.h2.Driver
spring.datasource.username=sa
spring.datasource.password=

spring.jpa.hibernate.ddl-auto=update
spring.jpa.properties.hibernate.globally_quoted_identifiers=true
spring.jpa.show-sql=false
spring.h2.console.enabled=true
"#;

const BUILD_DESCRIPTOR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 https://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>

    <parent>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-starter-parent</artifactId>
        <version>3.2.5</version>
        <relativePath/>
    </parent>

    <groupId>{{GROUP_ID}}</groupId>
    <artifactId>{{ARTIFACT_ID}}</artifactId>
    <version>0.0.1-SNAPSHOT</version>
    <name>{{CLASS_NAME}} service</name>
    <description>Generated CRUD application for {{QUALIFIED_NAME}}</description>

    <properties>
        <java.version>17</java.version>
    </properties>

    <dependencies>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-web</artifactId>
        </dependency>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-data-jpa</artifactId>
        </dependency>
        <dependency>
            <groupId>com.h2database</groupId>
            <artifactId>h2</artifactId>
            <scope>runtime</scope>
        </dependency>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-test</artifactId>
            <scope>test</scope>
        </dependency>
    </dependencies>

    <build>
        <finalName>{{ARTIFACT_ID}}</finalName>
        <plugins>
            <plugin>
                <groupId>org.springframework.boot</groupId>
                <artifactId>spring-boot-maven-plugin</artifactId>
            </plugin>
        </plugins>
    </build>
</project>
"#;

const SCHEMA_SCRIPT: &str = r#"-- Schema for {{QUALIFIED_NAME}} ({{FIELD_COUNT}} columns)
CREATE TABLE IF NOT EXISTS {{SQL_TABLE_NAME}} (
{{SQL_COLUMNS}}
);
"#;

/// Built-in template text for `kind`.
pub const fn template_for(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Model => MODEL,
        ArtifactKind::Repository => REPOSITORY,
        ArtifactKind::Service => SERVICE,
        ArtifactKind::Controller => CONTROLLER,
        ArtifactKind::Application => APPLICATION,
        ArtifactKind::Properties => PROPERTIES,
        ArtifactKind::BuildDescriptor => BUILD_DESCRIPTOR,
        ArtifactKind::SchemaScript => SCHEMA_SCRIPT,
    }
}

/// Every built-in template, in rendering order.
pub fn all_templates() -> impl Iterator<Item = (ArtifactKind, &'static str)> {
    ArtifactKind::ALL.into_iter().map(|k| (k, template_for(k)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use entigen_core::domain::{EntitySpec, FieldSpec, GenerationRequest, RenderContext};

    fn context() -> RenderContext {
        RenderContext::for_request(&GenerationRequest::new(EntitySpec::new(
            "com.demo.model.Order",
            vec![
                FieldSpec::new("id", "Long").primary(),
                FieldSpec::new("amount", "Double"),
                FieldSpec::new("createdAt", "timestamp"),
            ],
        )))
    }

    #[test]
    fn every_builtin_renders_without_unbound_placeholders() {
        let ctx = context();
        for (kind, template) in all_templates() {
            let out = ctx.render(template);
            assert!(out.is_ok(), "{kind}: {:?}", out.err());
        }
    }

    #[test]
    fn model_contains_fields_in_order() {
        let out = context().render(template_for(ArtifactKind::Model)).unwrap();
        assert!(out.starts_with("package com.demo.model;"));
        assert!(out.contains("import java.time.LocalDateTime;"));
        assert!(out.contains("public class Order {"));
        assert!(out.contains("public Order(Long id, Double amount, LocalDateTime createdAt) {"));

        let id = out.find("private Long id;").unwrap();
        let amount = out.find("private Double amount;").unwrap();
        assert!(id < amount);
    }

    #[test]
    fn pom_uses_group_and_artifact_ids() {
        let out = context()
            .render(template_for(ArtifactKind::BuildDescriptor))
            .unwrap();
        assert!(out.contains("<groupId>com.codegen</groupId>"));
        assert!(out.contains("<artifactId>order</artifactId>"));
        assert!(out.contains("<finalName>order</finalName>"));
    }

    #[test]
    fn schema_lists_columns_with_sql_types() {
        let out = context()
            .render(template_for(ArtifactKind::SchemaScript))
            .unwrap();
        assert!(out.contains("CREATE TABLE IF NOT EXISTS \"order\" ("));
        assert!(out.contains("    \"id\" BIGINT PRIMARY KEY,"));
        assert!(out.contains("    \"created_at\" TIMESTAMP\n);"));
        assert!(!out.contains(" order ("));
    }

    #[test]
    fn reserved_table_names_are_quoted_for_jpa() {
        let model = context().render(template_for(ArtifactKind::Model)).unwrap();
        assert!(model.contains(r#"@Table(name = "\"order\"")"#));

        let properties = context()
            .render(template_for(ArtifactKind::Properties))
            .unwrap();
        assert!(properties.contains("hibernate.globally_quoted_identifiers=true"));

        let controller = context()
            .render(template_for(ArtifactKind::Controller))
            .unwrap();
        assert!(controller.contains(r#"@RequestMapping("/api/order")"#));
    }

    #[test]
    fn repository_is_keyed_by_primary_type() {
        let out = context()
            .render(template_for(ArtifactKind::Repository))
            .unwrap();
        assert!(out.contains("extends JpaRepository<Order, Long>"));
    }
}
