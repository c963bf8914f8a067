use std::fs;
use std::path::Path;

use jbprojects::app::{search_projects, SearchSettings};
use jbprojects::domain::matcher::{FuzzyScorer, SequenceMatcherBlocks};
use jbprojects::domain::models::IdeKey;
use jbprojects::domain::query::IdeAliases;
use jbprojects::integrations::ide_locator::IdeLocator;
use jbprojects::integrations::project_source::{JetBrainsSource, ProjectSource};
use jbprojects::integrations::recent_projects::{parse_recent_entries, parse_recent_projects};

fn recent_projects_xml(shop: &str, blog: &str) -> String {
    format!(
        r#"<application>
  <component name="RecentProjectsManager">
    <option name="additionalInfo">
      <map>
        <entry key="{shop}">
          <value>
            <RecentProjectMetaInfo frameTitle="shop">
              <option name="projectOpenTimestamp" value="1700000000000" />
            </RecentProjectMetaInfo>
          </value>
        </entry>
        <entry key="{blog}">
          <value>
            <RecentProjectMetaInfo>
              <option name="projectOpenTimestamp" value="1710000000000" />
            </RecentProjectMetaInfo>
          </value>
        </entry>
      </map>
    </option>
    <option name="recentPaths">
      <list>
        <option value="{shop}" />
        <option value="$USER_HOME$/legacy" />
      </list>
    </option>
  </component>
</application>
"#
    )
}

fn write_options(config_root: &Path, dir_name: &str, file_name: &str, content: &str) {
    let options = config_root.join(dir_name).join("options");
    fs::create_dir_all(&options).expect("create options dir");
    fs::write(options.join(file_name), content).expect("write recent projects");
}

struct Fixture {
    _dir: tempfile::TempDir,
    config_root: std::path::PathBuf,
    studio_root: std::path::PathBuf,
    shop: String,
    blog: String,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("create tempdir");
    let config_root = dir.path().join("JetBrains");
    let studio_root = dir.path().join("Google");
    fs::create_dir_all(&studio_root).expect("create studio root");

    let shop_dir = dir.path().join("projects").join("shop");
    fs::create_dir_all(shop_dir.join(".idea")).expect("create shop .idea");
    fs::write(shop_dir.join(".idea").join(".name"), "Shop Backend\n").expect("write name");
    fs::write(shop_dir.join(".idea").join("icon.svg"), "<svg/>").expect("write icon");

    let blog_dir = dir.path().join("projects").join("blog");
    fs::create_dir_all(&blog_dir).expect("create blog");

    let shop = shop_dir.to_string_lossy().into_owned();
    let blog = blog_dir.to_string_lossy().into_owned();

    write_options(
        &config_root,
        "PyCharm2023.1",
        "recentProjects.xml",
        &recent_projects_xml("/old/one", "/old/two"),
    );
    write_options(
        &config_root,
        "PyCharm2024.1",
        "recentProjects.xml",
        &recent_projects_xml(&shop, &blog),
    );

    Fixture {
        _dir: dir,
        config_root,
        studio_root,
        shop,
        blog,
    }
}

#[test]
fn parser_reads_paths_names_icons_and_timestamps() {
    let fx = fixture();
    let file = fx
        .config_root
        .join("PyCharm2024.1/options/recentProjects.xml");

    let projects = parse_recent_projects(&file, IdeKey::Pycharm).expect("parse projects");
    assert_eq!(projects.len(), 3);

    assert_eq!(projects[0].name, "Shop Backend");
    assert_eq!(projects[0].path, fx.shop);
    assert_eq!(projects[0].timestamp, Some(1_700_000_000_000));
    assert!(projects[0]
        .icon
        .as_ref()
        .is_some_and(|icon| icon.ends_with(".idea/icon.svg")));

    assert_eq!(projects[1].name, "legacy");
    assert_eq!(projects[1].path, "~/legacy");
    assert_eq!(projects[1].timestamp, None);
    assert_eq!(projects[1].icon, None);

    assert_eq!(projects[2].name, "blog");
    assert_eq!(projects[2].path, fx.blog);
    assert_eq!(projects[2].timestamp, Some(1_710_000_000_000));
    assert!(projects.iter().all(|p| p.ide == IdeKey::Pycharm));
}

#[test]
fn missing_file_yields_no_projects() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let projects = parse_recent_projects(&dir.path().join("nope.xml"), IdeKey::Idea)
        .expect("missing file is not an error");
    assert!(projects.is_empty());
}

#[test]
fn directory_manager_entries_are_merged_without_duplicates() {
    let entries = parse_recent_entries(
        r#"<application>
             <component name="RecentDirectoryProjectsManager">
               <option name="recentPaths">
                 <list>
                   <option value="/a" />
                   <option value="/b" />
                   <option value="/a" />
                 </list>
               </option>
             </component>
             <component name="RecentProjectsManager">
               <option name="recentPaths">
                 <list>
                   <option value="/c" />
                   <option value="/b" />
                 </list>
               </option>
             </component>
           </application>"#,
    )
    .expect("parse xml");

    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["/c", "/b", "/a"]);
}

#[test]
fn malformed_xml_is_an_error() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = dir.path().join("recentProjects.xml");
    fs::write(&file, "<application><component").expect("write broken xml");

    let err = parse_recent_projects(&file, IdeKey::Clion).expect_err("broken xml should fail");
    assert!(err.to_string().contains("failed parsing recent projects file"));
}

#[test]
fn locator_prefers_newest_version() {
    let fx = fixture();
    let locator = IdeLocator::new(&fx.config_root, &fx.studio_root);

    let file = locator
        .recent_projects_file(IdeKey::Pycharm)
        .expect("pycharm file");
    assert!(file.starts_with(fx.config_root.join("PyCharm2024.1")));
    assert_eq!(locator.recent_projects_file(IdeKey::Webstorm), None);
}

#[test]
fn locator_handles_rider_and_android_studio() {
    let fx = fixture();
    write_options(
        &fx.config_root,
        "Rider2023.3",
        "recentSolutions.xml",
        &recent_projects_xml("/r/one", "/r/two"),
    );
    write_options(
        &fx.studio_root,
        "AndroidStudio2023.2",
        "recentProjects.xml",
        &recent_projects_xml("/s/one", "/s/two"),
    );
    let locator = IdeLocator::new(&fx.config_root, &fx.studio_root);

    assert!(locator
        .recent_projects_file(IdeKey::Rider)
        .is_some_and(|file| file.ends_with("recentSolutions.xml")));
    assert!(locator
        .recent_projects_file(IdeKey::AndroidStudio)
        .is_some_and(|file| file.starts_with(&fx.studio_root)));
}

#[test]
fn broken_ide_does_not_hide_others() {
    let fx = fixture();
    write_options(
        &fx.config_root,
        "WebStorm2024.1",
        "recentProjects.xml",
        "<application><component",
    );
    let source = JetBrainsSource::new(IdeLocator::new(&fx.config_root, &fx.studio_root));
    assert!(source.recent_projects(IdeKey::Webstorm).is_err());

    let scorer = FuzzyScorer::new(Box::new(SequenceMatcherBlocks));
    let (_, projects) = search_projects(
        &source,
        "",
        &IdeAliases::new(),
        SearchSettings {
            min_score: 60,
            limit: 8,
        },
        &scorer,
    );

    let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["blog", "Shop Backend", "legacy"]);
}

#[test]
fn query_search_over_filesystem_source() {
    let fx = fixture();
    let source = JetBrainsSource::new(IdeLocator::new(&fx.config_root, &fx.studio_root));
    let scorer = FuzzyScorer::new(Box::new(SequenceMatcherBlocks));

    let (query, projects) = search_projects(
        &source,
        "pycharm shop",
        &IdeAliases::new(),
        SearchSettings {
            min_score: 60,
            limit: 8,
        },
        &scorer,
    );

    assert_eq!(query.ide, Some(IdeKey::Pycharm));
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Shop Backend");
}
